//! Shared helpers for in-memory facade tests.

use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use tasklytics::Tasklytics;
use tasklytics::storage::{adapters::InMemoryObjectStore, services::StorageEngine};

/// Facade type exercised by the in-memory tests.
pub type MemoryApp = Tasklytics<InMemoryObjectStore, DefaultClock>;

/// Provides a facade over a fresh, empty database.
#[fixture]
pub fn app() -> MemoryApp {
    Tasklytics::new(
        StorageEngine::new(InMemoryObjectStore::new()),
        Arc::new(DefaultClock),
    )
}
