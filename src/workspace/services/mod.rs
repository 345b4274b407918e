//! Workspace services.

mod cascade;
mod workspaces;

pub use cascade::CascadeSummary;
pub use workspaces::WorkspaceService;
