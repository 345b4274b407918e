//! Application services for tasks.

mod tasks;

pub use tasks::TaskService;
