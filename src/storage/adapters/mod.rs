//! Adapter implementations of the object-store port.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryObjectStore;
pub use sqlite::{SqliteObjectStore, SqliteOptions, SqlitePool};

use crate::config::{DatabaseLocation, TasklyticsConfig};
use crate::storage::{
    domain::StorageResult,
    ports::{ObjectStore, StoreTransaction, TransactionMode},
};
use async_trait::async_trait;

/// Object store chosen at runtime from configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredObjectStore {
    /// Process-local store that is lost on exit.
    InMemory(InMemoryObjectStore),
    /// Store persisted in an SQLite database file.
    Sqlite(SqliteObjectStore),
}

impl ConfiguredObjectStore {
    /// Builds the adapter the configuration asks for.
    #[must_use]
    pub fn from_config(config: &TasklyticsConfig) -> Self {
        match config.database() {
            DatabaseLocation::InMemory => Self::InMemory(InMemoryObjectStore::new()),
            DatabaseLocation::File(path) => {
                let options = SqliteOptions::file(path.as_str())
                    .with_pool_size(config.pool_size())
                    .with_busy_timeout(config.busy_timeout());
                Self::Sqlite(SqliteObjectStore::open(&options))
            }
        }
    }
}

#[async_trait]
impl ObjectStore for ConfiguredObjectStore {
    async fn transact<F, T>(&self, mode: TransactionMode, work: F) -> StorageResult<T>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        match self {
            Self::InMemory(store) => store.transact(mode, work).await,
            Self::Sqlite(store) => store.transact(mode, work).await,
        }
    }
}
