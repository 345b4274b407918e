//! Runtime configuration for opening the Tasklytics database.

use camino::Utf8PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the database file (`:memory:` for none).
pub const DATABASE_ENV: &str = "TASKLYTICS_DATABASE";
/// Environment variable overriding the connection pool size.
pub const POOL_SIZE_ENV: &str = "TASKLYTICS_POOL_SIZE";
/// Environment variable overriding the busy timeout in milliseconds.
pub const BUSY_TIMEOUT_ENV: &str = "TASKLYTICS_BUSY_TIMEOUT_MS";

/// Default database file name, relative to the working directory.
pub const DEFAULT_DATABASE_FILE: &str = "tasklytics.sqlite3";

const IN_MEMORY_MARKER: &str = ":memory:";

/// Errors raised while reading configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The pool size is not a positive integer.
    #[error("invalid {POOL_SIZE_ENV} value '{0}': expected a positive integer")]
    InvalidPoolSize(String),
    /// The busy timeout is not a whole number of milliseconds.
    #[error("invalid {BUSY_TIMEOUT_ENV} value '{0}': expected milliseconds")]
    InvalidBusyTimeout(String),
    /// The database location is empty.
    #[error("{DATABASE_ENV} must not be empty")]
    EmptyDatabase,
}

/// Where the object stores live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// Process-local storage discarded on exit.
    InMemory,
    /// An SQLite database file.
    File(Utf8PathBuf),
}

impl DatabaseLocation {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim() {
            "" => Err(ConfigError::EmptyDatabase),
            IN_MEMORY_MARKER => Ok(Self::InMemory),
            path => Ok(Self::File(Utf8PathBuf::from(path))),
        }
    }
}

/// Settings used to build the object-store adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasklyticsConfig {
    database: DatabaseLocation,
    pool_size: u32,
    busy_timeout: Duration,
}

impl Default for TasklyticsConfig {
    fn default() -> Self {
        Self {
            database: DatabaseLocation::File(Utf8PathBuf::from(DEFAULT_DATABASE_FILE)),
            pool_size: 4,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl TasklyticsConfig {
    /// Configuration for a throwaway in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default().with_database(DatabaseLocation::InMemory)
    }

    /// Reads overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads overrides through `lookup`, starting from the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(DATABASE_ENV) {
            config.database = DatabaseLocation::parse(&raw)?;
        }
        if let Some(raw) = lookup(POOL_SIZE_ENV) {
            config.pool_size = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPoolSize(raw))?;
        }
        if let Some(raw) = lookup(BUSY_TIMEOUT_ENV) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidBusyTimeout(raw.clone()))?;
            config.busy_timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }

    /// Sets the database location.
    #[must_use]
    pub fn with_database(mut self, database: DatabaseLocation) -> Self {
        self.database = database;
        self
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Sets how long a connection waits on a locked database.
    #[must_use]
    pub const fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Returns the database location.
    #[must_use]
    pub const fn database(&self) -> &DatabaseLocation {
        &self.database
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Returns the busy timeout.
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let config = TasklyticsConfig::from_lookup(lookup_from(&[])).expect("defaults");
        assert_eq!(config, TasklyticsConfig::default());
        assert_eq!(
            config.database(),
            &DatabaseLocation::File(Utf8PathBuf::from(DEFAULT_DATABASE_FILE))
        );
    }

    #[rstest]
    fn memory_marker_selects_in_memory_database() {
        let config = TasklyticsConfig::from_lookup(lookup_from(&[(DATABASE_ENV, ":memory:")]))
            .expect("config");
        assert_eq!(config.database(), &DatabaseLocation::InMemory);
    }

    #[rstest]
    fn overrides_are_parsed() {
        let config = TasklyticsConfig::from_lookup(lookup_from(&[
            (DATABASE_ENV, "/tmp/tasks.db"),
            (POOL_SIZE_ENV, "8"),
            (BUSY_TIMEOUT_ENV, "250"),
        ]))
        .expect("config");
        assert_eq!(
            config.database(),
            &DatabaseLocation::File(Utf8PathBuf::from("/tmp/tasks.db"))
        );
        assert_eq!(config.pool_size(), 8);
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));
    }

    #[rstest]
    #[case(&[(POOL_SIZE_ENV, "0")], ConfigError::InvalidPoolSize("0".into()))]
    #[case(&[(POOL_SIZE_ENV, "many")], ConfigError::InvalidPoolSize("many".into()))]
    #[case(&[(BUSY_TIMEOUT_ENV, "-1")], ConfigError::InvalidBusyTimeout("-1".into()))]
    #[case(&[(DATABASE_ENV, "  ")], ConfigError::EmptyDatabase)]
    fn invalid_values_are_rejected(
        #[case] pairs: &[(&str, &str)],
        #[case] expected: ConfigError,
    ) {
        let err = TasklyticsConfig::from_lookup(lookup_from(pairs)).expect_err("invalid");
        assert_eq!(err, expected);
    }
}
