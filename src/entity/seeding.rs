//! Per-scope serialisation of default-data seeding.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Scope key used for entities that are not partitioned by workspace.
pub const GLOBAL_SCOPE: &str = "";

/// Async lock per seeding scope.
///
/// Concurrent seed calls for the same scope wait for each other instead of
/// returning early, so every caller observes the seeded state once its call
/// completes.
#[derive(Debug, Clone, Default)]
pub struct SeedGuard {
    scopes: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl SeedGuard {
    /// Creates a guard with no scopes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `scope`.
    pub async fn lock(&self, scope: &str) -> OwnedMutexGuard<()> {
        let gate = {
            let mut scopes = self.scopes.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(scopes.entry(scope.to_owned()).or_default())
        };
        gate.lock_owned().await
    }
}
