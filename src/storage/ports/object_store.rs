//! Object-store port implemented by every storage adapter.

use crate::storage::domain::{Record, StorageError, StorageResult, StoreName};
use async_trait::async_trait;

/// Access mode of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionMode {
    /// Reads only; any write fails with
    /// [`StorageError::ReadOnlyTransaction`].
    ReadOnly,
    /// Reads and writes, committed together.
    ReadWrite,
}

impl TransactionMode {
    /// Rejects writes in read-only mode.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnlyTransaction`] for
    /// [`TransactionMode::ReadOnly`].
    pub const fn ensure_writable(self, store: StoreName) -> StorageResult<()> {
        match self {
            Self::ReadOnly => Err(StorageError::ReadOnlyTransaction(store)),
            Self::ReadWrite => Ok(()),
        }
    }
}

/// Operations available inside one native transaction.
///
/// Methods are synchronous: the adapter holds its connection or lock for the
/// whole unit of work and commits only if the unit returns `Ok`.
pub trait StoreTransaction {
    /// Returns the access mode of this transaction.
    fn mode(&self) -> TransactionMode;

    /// Returns the schema version recorded in the database (0 when new).
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the version cannot be read.
    fn schema_version(&mut self) -> StorageResult<u32>;

    /// Records a new schema version.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the version cannot be written.
    fn set_schema_version(&mut self, version: u32) -> StorageResult<()>;

    /// Lists the stores that exist.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the catalogue cannot be read.
    fn store_names(&mut self) -> StorageResult<Vec<StoreName>>;

    /// Creates a store if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store cannot be created.
    fn create_store(&mut self, store: StoreName) -> StorageResult<()>;

    /// Fetches a record by key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::StoreMissing`] for unknown stores.
    fn get(&mut self, store: StoreName, key: &str) -> StorageResult<Option<Record>>;

    /// Fetches every record of a store in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::StoreMissing`] for unknown stores.
    fn get_all(&mut self, store: StoreName) -> StorageResult<Vec<Record>>;

    /// Fetches the records of a store that belong to a workspace.
    ///
    /// The default implementation scans the whole store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::StoreMissing`] for unknown stores.
    fn get_all_by_workspace(
        &mut self,
        store: StoreName,
        workspace_id: &str,
    ) -> StorageResult<Vec<Record>> {
        let records = self.get_all(store)?;
        Ok(records
            .into_iter()
            .filter(|record| record.workspace_id() == Some(workspace_id))
            .collect())
    }

    /// Inserts a record whose key must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DuplicateKey`] when the key is taken.
    fn add(&mut self, store: StoreName, record: Record) -> StorageResult<()>;

    /// Inserts or replaces a record by key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingKey`] when the record has no key.
    fn put(&mut self, store: StoreName, record: Record) -> StorageResult<()>;

    /// Removes a record; absent keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::StoreMissing`] for unknown stores.
    fn delete(&mut self, store: StoreName, key: &str) -> StorageResult<()>;

    /// Removes every record of a store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::StoreMissing`] for unknown stores.
    fn clear(&mut self, store: StoreName) -> StorageResult<()>;
}

/// Embedded transactional object-store database.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Runs `work` inside a single transaction.
    ///
    /// Everything `work` writes is committed when it returns `Ok` and
    /// discarded when it returns `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when the database cannot be
    /// reached, or the error produced by `work`.
    async fn transact<F, T>(&self, mode: TransactionMode, work: F) -> StorageResult<T>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> StorageResult<T> + Send + 'static,
        T: Send + 'static;
}
