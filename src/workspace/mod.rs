//! Workspaces: isolated sets of tasks and their taxonomy.

pub mod domain;
pub mod services;
