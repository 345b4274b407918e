//! Capabilities shared by persisted entity types.

use super::WorkspaceId;
use crate::storage::domain::StoreName;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;

/// A typed record living in one object store.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Identifier type.
    type Id: AsRef<str> + Clone + fmt::Display + Send + Sync + 'static;

    /// Partial update accepted by [`Entity::apply_patch`].
    type Patch: Send + 'static;

    /// Object store holding this entity.
    const STORE: StoreName;

    /// Lower-case name used in errors and logs.
    const KIND: &'static str;

    /// Returns the identifier.
    fn id(&self) -> &Self::Id;

    /// Applies a patch field by field.
    ///
    /// Implementations never touch the identifier or creation time.
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

/// An entity partitioned by workspace.
pub trait WorkspaceScoped: Entity {
    /// Returns the owning workspace.
    fn workspace_id(&self) -> &WorkspaceId;
}

/// An entity with a display position within its workspace.
pub trait Ranked: WorkspaceScoped {
    /// Returns the display position.
    fn order(&self) -> u32;

    /// Moves the entity to a new display position.
    fn set_order(&mut self, order: u32);
}
