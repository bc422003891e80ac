pub mod task_models;

pub use task_models::{Task, TaskCategory, TaskStatus};
