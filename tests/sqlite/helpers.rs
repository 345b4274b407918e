//! Shared helpers for SQLite integration tests.

use camino::Utf8PathBuf;
use eyre::{OptionExt, Result};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use tasklytics::Tasklytics;
use tasklytics::storage::{
    adapters::{SqliteObjectStore, SqliteOptions},
    services::StorageEngine,
};
use tempfile::TempDir;

/// Facade type exercised by the SQLite tests.
pub type SqliteApp = Tasklytics<SqliteObjectStore, DefaultClock>;

/// A database file inside a directory removed on drop.
pub struct TempDatabase {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl TempDatabase {
    /// Returns the database file path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Opens a new store on the file, as a fresh process would.
    #[must_use]
    pub fn store(&self) -> SqliteObjectStore {
        SqliteObjectStore::open(&SqliteOptions::file(self.path()))
    }

    /// Opens a new facade on the file.
    #[must_use]
    pub fn open(&self) -> SqliteApp {
        Tasklytics::new(StorageEngine::new(self.store()), Arc::new(DefaultClock))
    }
}

/// Provides an empty database file.
///
/// # Errors
///
/// Returns an error if the temporary directory cannot be created or its
/// path is not UTF-8.
#[fixture]
pub fn database() -> Result<TempDatabase> {
    let dir = tempfile::tempdir()?;
    let path = Utf8PathBuf::from_path_buf(dir.path().join("tasklytics.sqlite3"))
        .ok()
        .ok_or_eyre("temporary path is not UTF-8")?;
    Ok(TempDatabase { _dir: dir, path })
}
