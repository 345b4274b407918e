//! Domain model for the storage engine.
//!
//! Stores hold schemaless JSON [`Record`]s addressed by a string key. The
//! types here carry no infrastructure dependency.

mod error;
mod record;
mod setting_key;
mod snapshot;
mod store_name;

pub use error::{ParseStoreNameError, StorageError, StorageResult};
pub use record::{Record, SETTING_VALUE_FIELD, WORKSPACE_ID_FIELD};
pub use setting_key::SettingKey;
pub use snapshot::Snapshot;
pub use store_name::{KeyPath, StoreName};
