pub mod announcement_models;

pub use announcement_models::Announcement;
