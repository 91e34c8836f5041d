//! Read operations for record tasks

pub mod get_task;
pub mod list_tasks;

pub use get_task::{GetTaskError, GetTaskQuery};
pub use list_tasks::{ListTasksError, ListTasksQuery};
