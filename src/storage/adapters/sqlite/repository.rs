//! SQLite-backed object store.

use super::{schema::BOOTSTRAP_SQL, transaction::SqliteTransaction};
use crate::storage::{
    domain::{StorageError, StorageResult},
    ports::{ObjectStore, StoreTransaction, TransactionMode},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use std::time::Duration;

/// SQLite connection pool type used by the object store.
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Location and tuning of an SQLite database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteOptions {
    database_url: String,
    pool_size: u32,
    busy_timeout: Duration,
}

impl SqliteOptions {
    /// Default number of pooled connections for file databases.
    pub const DEFAULT_POOL_SIZE: u32 = 4;

    /// Default time a connection waits on a locked database.
    pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

    /// Options for a database file at `path`.
    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            database_url: path.into(),
            pool_size: Self::DEFAULT_POOL_SIZE,
            busy_timeout: Self::DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Options for a private in-memory database.
    ///
    /// The pool is pinned to a single long-lived connection because every
    /// SQLite in-memory connection is its own database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            database_url: ":memory:".to_owned(),
            pool_size: 1,
            busy_timeout: Self::DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Sets the busy timeout applied to each connection.
    #[must_use]
    pub const fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.database_url == ":memory:"
    }
}

/// Per-connection setup: pragmas plus the bootstrap tables.
#[derive(Debug, Clone, Copy)]
struct ConnectionSetup {
    busy_timeout_ms: u128,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionSetup {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)?;
        conn.batch_execute(BOOTSTRAP_SQL)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Object store persisted in an embedded SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteObjectStore {
    pool: SqlitePool,
}

impl SqliteObjectStore {
    /// Creates a store from an existing connection pool.
    ///
    /// The pool's connections must already carry the bootstrap tables.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Prepares a store for the given options.
    ///
    /// No connection is opened here; failures to open the database surface
    /// as [`StorageError::Unavailable`] from the first transaction.
    #[must_use]
    pub fn open(options: &SqliteOptions) -> Self {
        let manager = ConnectionManager::<SqliteConnection>::new(options.database_url.as_str());
        let mut builder = Pool::builder()
            .max_size(options.pool_size.max(1))
            .connection_customizer(Box::new(ConnectionSetup {
                busy_timeout_ms: options.busy_timeout.as_millis(),
            }));
        if options.is_in_memory() {
            builder = builder.max_size(1).idle_timeout(None).max_lifetime(None);
        }
        Self::new(builder.build_unchecked(manager))
    }
}

/// Failure inside a Diesel transaction closure.
enum TransactionFailure {
    Storage(StorageError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TransactionFailure {
    fn from(err: diesel::result::Error) -> Self {
        Self::Diesel(err)
    }
}

impl From<TransactionFailure> for StorageError {
    fn from(failure: TransactionFailure) -> Self {
        match failure {
            TransactionFailure::Storage(err) => err,
            TransactionFailure::Diesel(err) => Self::backend(err),
        }
    }
}

fn run_in_transaction<F, T>(
    conn: &mut SqliteConnection,
    mode: TransactionMode,
    work: F,
) -> StorageResult<T>
where
    F: FnOnce(&mut dyn StoreTransaction) -> StorageResult<T>,
{
    let unit = |inner: &mut SqliteConnection| -> Result<T, TransactionFailure> {
        let mut transaction = SqliteTransaction::new(inner, mode);
        work(&mut transaction).map_err(TransactionFailure::Storage)
    };
    let outcome = match mode {
        TransactionMode::ReadOnly => conn.transaction(unit),
        TransactionMode::ReadWrite => conn.immediate_transaction(unit),
    };
    outcome.map_err(StorageError::from)
}

#[async_trait]
impl ObjectStore for SqliteObjectStore {
    async fn transact<F, T>(&self, mode: TransactionMode, work: F) -> StorageResult<T>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(StorageError::unavailable)?;
            run_in_transaction(&mut conn, mode, work)
        })
        .await
        .map_err(StorageError::backend)?
    }
}
