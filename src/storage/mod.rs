//! Embedded transactional object-store database.
//!
//! The engine keeps named object stores of JSON records in a single local
//! database and upgrades its schema in place. Every other module reaches
//! persistence through [`services::StorageEngine`].
//!
//! # Architecture
//!
//! - **Domain**: store names, records, settings keys, snapshots and errors
//! - **Ports**: the [`ports::ObjectStore`] transaction contract
//! - **Adapters**: in-memory and `SQLite` implementations
//! - **Services**: the shared engine handle, migrations and export/import

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
