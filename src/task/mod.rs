//! Tasks: the units of work tracked inside a workspace.
//!
//! - Domain types, filtering and sorting in [`domain`]
//! - Persistence orchestration in [`services`]

pub mod domain;
pub mod services;
