//! Shared handle over an initialised object store.

use super::migrations::{self, SCHEMA_VERSION};
use crate::storage::{
    domain::{Record, SettingKey, StorageError, StorageResult, StoreName},
    ports::{ObjectStore, StoreTransaction, TransactionMode},
};
use mockable::{Clock, DefaultClock};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Logical name of the Tasklytics database.
pub const DATABASE_NAME: &str = "TasklyticsDB";

/// Cloneable, process-wide handle to the embedded database.
///
/// The first operation on any clone opens the database and upgrades it to
/// [`SCHEMA_VERSION`]; concurrent callers share that single initialisation.
pub struct StorageEngine<S: ObjectStore> {
    inner: Arc<EngineInner<S>>,
}

struct EngineInner<S> {
    store: S,
    ready: OnceCell<u32>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl<S: ObjectStore> Clone for StorageEngine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ObjectStore> StorageEngine<S> {
    /// Wraps an object store, stamping migration records with the system
    /// clock.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(DefaultClock))
    }

    /// Wraps an object store with an explicit clock.
    #[must_use]
    pub fn with_clock(store: S, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                store,
                ready: OnceCell::new(),
                clock,
            }),
        }
    }

    /// Opens the database and applies pending migrations.
    ///
    /// Idempotent. A failure is not remembered, so the next call retries.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VersionTooNew`] when the database was written
    /// by a newer build, or the adapter's error when it cannot be opened.
    pub async fn init(&self) -> StorageResult<u32> {
        let version = self
            .inner
            .ready
            .get_or_try_init(|| async {
                let now = self.inner.clock.utc();
                let previous = self
                    .inner
                    .store
                    .transact(TransactionMode::ReadWrite, move |tx| {
                        migrations::upgrade(tx, now)
                    })
                    .await?;
                if previous < SCHEMA_VERSION {
                    info!(
                        database = DATABASE_NAME,
                        from = previous,
                        to = SCHEMA_VERSION,
                        "database schema upgraded"
                    );
                } else {
                    debug!(database = DATABASE_NAME, version = SCHEMA_VERSION, "database opened");
                }
                Ok::<_, StorageError>(SCHEMA_VERSION)
            })
            .await?;
        Ok(*version)
    }

    /// Runs a read-only unit of work in one transaction.
    ///
    /// # Errors
    ///
    /// Returns any error raised by initialisation or by `work`.
    pub async fn read<F, T>(&self, work: F) -> StorageResult<T>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.init().await?;
        self.inner
            .store
            .transact(TransactionMode::ReadOnly, work)
            .await
    }

    /// Runs a read-write unit of work in one transaction.
    ///
    /// Nothing `work` wrote is kept if it returns an error.
    ///
    /// # Errors
    ///
    /// Returns any error raised by initialisation or by `work`.
    pub async fn write<F, T>(&self, work: F) -> StorageResult<T>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.init().await?;
        self.inner
            .store
            .transact(TransactionMode::ReadWrite, work)
            .await
    }

    /// Returns every record of a store in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be read.
    pub async fn get_all(&self, store: StoreName) -> StorageResult<Vec<Record>> {
        self.read(move |tx| tx.get_all(store)).await
    }

    /// Returns the records of a scoped store that belong to a workspace.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be read.
    pub async fn get_all_by_workspace(
        &self,
        store: StoreName,
        workspace_id: &str,
    ) -> StorageResult<Vec<Record>> {
        let scope = workspace_id.to_owned();
        self.read(move |tx| tx.get_all_by_workspace(store, &scope))
            .await
    }

    /// Returns one record by key.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be read.
    pub async fn get(&self, store: StoreName, key: &str) -> StorageResult<Option<Record>> {
        let owned_key = key.to_owned();
        self.read(move |tx| tx.get(store, &owned_key)).await
    }

    /// Inserts a record whose key must be new.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DuplicateKey`] when the key already exists.
    pub async fn add(&self, store: StoreName, record: Record) -> StorageResult<()> {
        self.write(move |tx| tx.add(store, record)).await
    }

    /// Inserts or replaces a record.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the record cannot be written.
    pub async fn put(&self, store: StoreName, record: Record) -> StorageResult<()> {
        self.write(move |tx| tx.put(store, record)).await
    }

    /// Removes a record; absent keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be written.
    pub async fn delete(&self, store: StoreName, key: &str) -> StorageResult<()> {
        let owned_key = key.to_owned();
        self.write(move |tx| tx.delete(store, &owned_key)).await
    }

    /// Lists the stores present in the database.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the catalogue cannot be read.
    pub async fn store_names(&self) -> StorageResult<Vec<StoreName>> {
        self.read(|tx| tx.store_names()).await
    }

    /// Removes every record from one store.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be written.
    pub async fn clear_store(&self, store: StoreName) -> StorageResult<()> {
        self.write(move |tx| tx.clear(store)).await
    }

    /// Removes every record from every store in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TransactionAborted`] when any store fails;
    /// no store is cleared in that case.
    pub async fn clear_all_stores(&self) -> StorageResult<()> {
        self.write(|tx| {
            for store in tx.store_names()? {
                tx.clear(store)?;
            }
            Ok(())
        })
        .await
        .map_err(|err| err.aborted("clear all stores"))?;
        info!("all stores cleared");
        Ok(())
    }

    /// Reads a typed setting.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Malformed`] when the stored value does not
    /// match `T`.
    pub async fn get_setting<T>(&self, key: &SettingKey) -> StorageResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let record = self.get(StoreName::Settings, &key.to_string()).await?;
        record
            .and_then(|found| found.setting_value().cloned())
            .map(|value| serde_json::from_value(value).map_err(StorageError::malformed))
            .transpose()
    }

    /// Writes a typed setting.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the value cannot be serialized or
    /// written.
    pub async fn put_setting<T>(&self, key: &SettingKey, value: &T) -> StorageResult<()>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(value).map_err(StorageError::malformed)?;
        self.put(StoreName::Settings, Record::setting(key.to_string(), payload))
            .await
    }

    /// Removes a setting.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the store cannot be written.
    pub async fn delete_setting(&self, key: &SettingKey) -> StorageResult<()> {
        self.delete(StoreName::Settings, &key.to_string()).await
    }
}
