//! Whole-database export format.

use super::{Record, StorageError, StorageResult, StoreName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of every object store, keyed by store name.
///
/// Serializes as a flat JSON object whose keys are store names and whose
/// values are arrays of records. The format carries no version marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, Vec<Record>>);

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a snapshot from exported JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Malformed`] when the text is not a JSON object
    /// of record arrays.
    pub fn from_json(text: &str) -> StorageResult<Self> {
        serde_json::from_str(text).map_err(StorageError::malformed)
    }

    /// Renders the snapshot as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Malformed`] if serialization fails.
    pub fn to_json_pretty(&self) -> StorageResult<String> {
        serde_json::to_string_pretty(self).map_err(StorageError::malformed)
    }

    /// Replaces the records of a store.
    pub fn insert(&mut self, store: StoreName, records: Vec<Record>) {
        self.0.insert(store.as_str().to_owned(), records);
    }

    /// Returns the records of a store, or an empty slice when absent.
    #[must_use]
    pub fn records(&self, store: StoreName) -> &[Record] {
        self.0.get(store.as_str()).map_or(&[], Vec::as_slice)
    }

    /// Removes and returns the records of a store.
    pub fn take(&mut self, store: StoreName) -> Vec<Record> {
        self.0.remove(store.as_str()).unwrap_or_default()
    }

    /// Returns the raw store names present, including unknown ones.
    pub fn store_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
