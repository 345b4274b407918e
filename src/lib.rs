//! Tasklytics: local persistence core for a single-user task manager.
//!
//! Tasks, statuses, priorities, tags, workspaces, attachments and settings
//! live in one embedded database, either SQLite or an in-process store.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: entities, requests and patches with no storage concerns
//! - **Ports**: the object-store contract adapters implement
//! - **Adapters**: in-memory and SQLite object stores
//! - **Services**: orchestration over the shared [`storage::services::StorageEngine`]
//!
//! # Modules
//!
//! - [`storage`]: object stores, schema migrations, export and import
//! - [`entity`]: identifiers, entity traits and the typed repository
//! - [`task`]: tasks with filtering and sorting
//! - [`taxonomy`]: statuses, priorities and tags
//! - [`workspace`]: workspaces and their cascading delete
//! - [`attachment`]: files stored as data URLs
//! - [`settings`]: per-workspace branding and global preferences
//! - [`app`]: the [`app::Tasklytics`] facade and first-run bootstrap

pub mod app;
pub mod attachment;
pub mod config;
pub mod entity;
pub mod settings;
pub mod storage;
pub mod task;
pub mod taxonomy;
pub mod telemetry;
pub mod workspace;

pub use app::Tasklytics;
pub use config::{ConfigError, DatabaseLocation, TasklyticsConfig};

#[cfg(test)]
mod test_support;
