// Declare submodules
pub mod message_formatter;
pub mod notification_models;
pub mod notification_dto;
pub mod notification_dispatcher;
pub mod notification_handlers;
pub mod notification_service;
pub mod routes;

// Re-export public items
pub use message_formatter::FormatterConfig;
pub use notification_dto::EventAcceptedResponse;
pub use notification_dispatcher::TelegramDispatcher;
pub use notification_service::NotificationService;
