//! Diesel row models for the object-store tables.

use super::schema::{object_stores, records};
use diesel::prelude::*;

/// Insert model for record rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = records)]
pub(super) struct NewRecordRow<'a> {
    /// Owning store name.
    pub store: &'a str,
    /// Record key.
    pub record_key: &'a str,
    /// Owning workspace, if any.
    pub workspace_id: Option<&'a str>,
    /// Record JSON.
    pub body: &'a str,
}

/// Insert model for the store catalogue.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = object_stores)]
pub(super) struct NewObjectStoreRow<'a> {
    /// Canonical store name.
    pub name: &'a str,
    /// Key attribute of the store.
    pub key_path: &'a str,
}
