//! Diesel schema for the embedded object-store database.

diesel::table! {
    /// Singleton row holding the schema version.
    schema_meta (id) {
        /// Always 1.
        id -> Integer,
        /// Applied schema version.
        version -> Integer,
    }
}

diesel::table! {
    /// Catalogue of created object stores.
    object_stores (name) {
        /// Canonical store name.
        name -> Text,
        /// Attribute the store's records are keyed by.
        key_path -> Text,
    }
}

diesel::table! {
    /// Records of every object store.
    records (seq) {
        /// Insertion sequence, preserved when a record is replaced.
        seq -> BigInt,
        /// Owning store name.
        store -> Text,
        /// Record key within the store.
        record_key -> Text,
        /// Copy of the record's `workspaceId`, for indexed lookups.
        workspace_id -> Nullable<Text>,
        /// Record JSON.
        body -> Text,
    }
}

/// DDL applied to every new pooled connection.
pub(super) const BOOTSTRAP_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS object_stores (
    name TEXT PRIMARY KEY NOT NULL,
    key_path TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS records (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    store TEXT NOT NULL REFERENCES object_stores (name),
    record_key TEXT NOT NULL,
    workspace_id TEXT,
    body TEXT NOT NULL,
    UNIQUE (store, record_key)
);
CREATE INDEX IF NOT EXISTS idx_records_workspace ON records (store, workspace_id);
";
