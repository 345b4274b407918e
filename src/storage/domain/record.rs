//! Untyped JSON records held by object stores.

use super::{StorageError, StorageResult, StoreName};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// JSON attribute naming the owning workspace of a scoped record.
pub const WORKSPACE_ID_FIELD: &str = "workspaceId";

/// JSON attribute holding the payload of a settings record.
pub const SETTING_VALUE_FIELD: &str = "value";

/// A single JSON object stored in an object store.
///
/// Records are schemaless at this layer. Entity services convert them to and
/// from their typed forms with [`Record::from_entity`] and
/// [`Record::into_entity`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wraps an existing JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Converts an arbitrary JSON value into a record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Malformed`] when the value is not an object.
    pub fn from_value(value: Value) -> StorageResult<Self> {
        serde_json::from_value(value).map_err(StorageError::malformed)
    }

    /// Serializes a typed entity into a record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Malformed`] when the entity does not serialize
    /// to a JSON object.
    pub fn from_entity<T: Serialize>(entity: &T) -> StorageResult<Self> {
        let value = serde_json::to_value(entity).map_err(StorageError::malformed)?;
        Self::from_value(value)
    }

    /// Deserializes the record into a typed entity.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Malformed`] when the record does not match the
    /// entity's shape.
    pub fn into_entity<T: DeserializeOwned>(self) -> StorageResult<T> {
        serde_json::from_value(Value::Object(self.0)).map_err(StorageError::malformed)
    }

    /// Builds a `{key, value}` record for the `settings` store.
    #[must_use]
    pub fn setting(key: impl Into<String>, value: Value) -> Self {
        let mut fields = Map::new();
        fields.insert("key".to_owned(), Value::String(key.into()));
        fields.insert(SETTING_VALUE_FIELD.to_owned(), value);
        Self(fields)
    }

    /// Returns the payload of a settings record.
    #[must_use]
    pub fn setting_value(&self) -> Option<&Value> {
        self.0.get(SETTING_VALUE_FIELD)
    }

    /// Returns the record's primary key for the given store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingKey`] when the key attribute is absent
    /// or not a string.
    pub fn key(&self, store: StoreName) -> StorageResult<&str> {
        let key_path = store.key_path().as_str();
        self.str_field(key_path)
            .ok_or(StorageError::MissingKey { store, key_path })
    }

    /// Returns the owning workspace identifier, if the record has one.
    #[must_use]
    pub fn workspace_id(&self) -> Option<&str> {
        self.str_field(WORKSPACE_ID_FIELD)
    }

    /// Stamps the record with the given workspace identifier.
    pub fn set_workspace_id(&mut self, workspace_id: &str) {
        self.set(WORKSPACE_ID_FIELD, Value::String(workspace_id.to_owned()));
    }

    /// Returns a field as a string slice when it is a JSON string.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Returns a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, name: &str, value: Value) {
        self.0.insert(name.to_owned(), value);
    }

    /// Consumes the record and returns the underlying JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Object(record.0)
    }
}
