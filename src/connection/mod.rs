pub mod connection_manager;
pub mod connection_probe;
pub mod connection_handlers;
pub mod routes;

pub use connection_manager::{ConnectionManager, ConnectionPhase, ConnectionState, RetryPolicy};
pub use connection_probe::{probe_from_config, BackendProbe};
pub use connection_handlers::ReadinessResponse;
