//! Domain model for tasks.
//!
//! A task belongs to one workspace and refers to its status, priority, tags
//! and attachments by identifier only.

mod query;
mod task;

pub use query::{
    DueWindow, ParseTaskSortError, SortDirection, SortField, StatusCount, TaskFilter, TaskSort,
    count_by_status,
};
pub use task::{NewTask, Task, TaskPatch};
