//! In-memory object store for tests and ephemeral sessions.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::storage::{
    domain::{Record, StorageError, StorageResult, StoreName},
    ports::{ObjectStore, StoreTransaction, TransactionMode},
};

/// Thread-safe in-memory object store.
///
/// Read-only units share the current state under a read lock. A read-write
/// unit works on a staged copy that replaces the shared state only when it
/// succeeds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Clone, Default)]
struct InMemoryState {
    version: u32,
    stores: BTreeMap<StoreName, InMemoryTable>,
    next_seq: u64,
}

#[derive(Debug, Clone, Default)]
struct InMemoryTable {
    rows: HashMap<String, StoredRow>,
}

#[derive(Debug, Clone)]
struct StoredRow {
    seq: u64,
    record: Record,
}

impl InMemoryObjectStore {
    /// Creates an empty, uninitialised store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn run<F, T>(&self, mode: TransactionMode, work: F) -> StorageResult<T>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> StorageResult<T>,
    {
        if mode == TransactionMode::ReadOnly {
            let shared = self.state.read().map_err(|err| {
                StorageError::unavailable(std::io::Error::other(err.to_string()))
            })?;
            return work(&mut InMemoryTransaction {
                state: StateAccess::Shared(&*shared),
            });
        }
        let mut shared = self.state.write().map_err(|err| {
            StorageError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let mut staged = shared.clone();
        let outcome = work(&mut InMemoryTransaction {
            state: StateAccess::Staged(&mut staged),
        })?;
        *shared = staged;
        Ok(outcome)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn transact<F, T>(&self, mode: TransactionMode, work: F) -> StorageResult<T>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run(mode, work)
    }
}

enum StateAccess<'a> {
    Shared(&'a InMemoryState),
    Staged(&'a mut InMemoryState),
}

struct InMemoryTransaction<'a> {
    state: StateAccess<'a>,
}

impl InMemoryTransaction<'_> {
    fn state(&self) -> &InMemoryState {
        match &self.state {
            StateAccess::Shared(state) => *state,
            StateAccess::Staged(state) => &**state,
        }
    }

    fn state_mut(&mut self, store: StoreName) -> StorageResult<&mut InMemoryState> {
        match &mut self.state {
            StateAccess::Shared(_) => Err(StorageError::ReadOnlyTransaction(store)),
            StateAccess::Staged(state) => Ok(&mut **state),
        }
    }

    fn table(&self, store: StoreName) -> StorageResult<&InMemoryTable> {
        self.state()
            .stores
            .get(&store)
            .ok_or(StorageError::StoreMissing(store))
    }

    fn table_mut(&mut self, store: StoreName) -> StorageResult<&mut InMemoryTable> {
        self.state_mut(store)?
            .stores
            .get_mut(&store)
            .ok_or(StorageError::StoreMissing(store))
    }
}

impl InMemoryState {
    fn allocate_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

impl StoreTransaction for InMemoryTransaction<'_> {
    fn mode(&self) -> TransactionMode {
        match self.state {
            StateAccess::Shared(_) => TransactionMode::ReadOnly,
            StateAccess::Staged(_) => TransactionMode::ReadWrite,
        }
    }

    fn schema_version(&mut self) -> StorageResult<u32> {
        Ok(self.state().version)
    }

    fn set_schema_version(&mut self, version: u32) -> StorageResult<()> {
        self.state_mut(StoreName::Settings)?.version = version;
        Ok(())
    }

    fn store_names(&mut self) -> StorageResult<Vec<StoreName>> {
        Ok(self.state().stores.keys().copied().collect())
    }

    fn create_store(&mut self, store: StoreName) -> StorageResult<()> {
        self.state_mut(store)?.stores.entry(store).or_default();
        Ok(())
    }

    fn get(&mut self, store: StoreName, key: &str) -> StorageResult<Option<Record>> {
        let table = self.table(store)?;
        Ok(table.rows.get(key).map(|row| row.record.clone()))
    }

    fn get_all(&mut self, store: StoreName) -> StorageResult<Vec<Record>> {
        let table = self.table(store)?;
        let mut rows: Vec<&StoredRow> = table.rows.values().collect();
        rows.sort_by_key(|row| row.seq);
        Ok(rows.into_iter().map(|row| row.record.clone()).collect())
    }

    fn add(&mut self, store: StoreName, record: Record) -> StorageResult<()> {
        let key = record.key(store)?.to_owned();
        if self.table_mut(store)?.rows.contains_key(&key) {
            return Err(StorageError::DuplicateKey { store, key });
        }
        let seq = self.state_mut(store)?.allocate_seq();
        self.table_mut(store)?
            .rows
            .insert(key, StoredRow { seq, record });
        Ok(())
    }

    fn put(&mut self, store: StoreName, record: Record) -> StorageResult<()> {
        let key = record.key(store)?.to_owned();
        let existing_seq = self.table_mut(store)?.rows.get(&key).map(|row| row.seq);
        let state = self.state_mut(store)?;
        let seq = existing_seq.unwrap_or_else(|| state.allocate_seq());
        self.table_mut(store)?
            .rows
            .insert(key, StoredRow { seq, record });
        Ok(())
    }

    fn delete(&mut self, store: StoreName, key: &str) -> StorageResult<()> {
        self.table_mut(store)?.rows.remove(key);
        Ok(())
    }

    fn clear(&mut self, store: StoreName) -> StorageResult<()> {
        self.table_mut(store)?.rows.clear();
        Ok(())
    }
}
