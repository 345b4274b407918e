//! Storage engine services: shared initialisation, migrations and transfer.

mod engine;
mod migrations;
mod transfer;

pub use engine::{DATABASE_NAME, StorageEngine};
pub use migrations::SCHEMA_VERSION;
pub use transfer::ImportSummary;
