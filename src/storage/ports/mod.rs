//! Port definitions for the storage engine.

pub mod object_store;

pub use object_store::{ObjectStore, StoreTransaction, TransactionMode};
