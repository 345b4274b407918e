//! Stable identifiers for the object stores of the embedded database.

use super::ParseStoreNameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of an object store.
///
/// Store names are part of the export format and must never change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StoreName {
    /// Task records.
    Tasks,
    /// Status records (kanban columns).
    Statuses,
    /// Tag records, shared across workspaces.
    Tags,
    /// Priority records.
    Priorities,
    /// Workspace records.
    Workspaces,
    /// Binary attachments encoded as data URLs.
    Attachments,
    /// Key/value settings.
    Settings,
}

/// Attribute of a record that holds its primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPath {
    /// Records keyed by their `id` field.
    Id,
    /// Records keyed by their `key` field (settings).
    Key,
}

impl KeyPath {
    /// Returns the JSON attribute name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Key => "key",
        }
    }
}

impl StoreName {
    /// Every store known to the current schema, in creation order.
    pub const ALL: [Self; 7] = [
        Self::Tasks,
        Self::Statuses,
        Self::Tags,
        Self::Priorities,
        Self::Settings,
        Self::Attachments,
        Self::Workspaces,
    ];

    /// Stores whose records carry a `workspaceId` partition key.
    pub const WORKSPACE_SCOPED: [Self; 4] = [
        Self::Tasks,
        Self::Statuses,
        Self::Priorities,
        Self::Attachments,
    ];

    /// Returns the canonical store name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Statuses => "statuses",
            Self::Tags => "tags",
            Self::Priorities => "priorities",
            Self::Workspaces => "workspaces",
            Self::Attachments => "attachments",
            Self::Settings => "settings",
        }
    }

    /// Returns the key path records of this store are addressed by.
    #[must_use]
    pub const fn key_path(self) -> KeyPath {
        match self {
            Self::Settings => KeyPath::Key,
            _ => KeyPath::Id,
        }
    }

    /// Returns `true` when records of this store belong to a workspace.
    #[must_use]
    pub const fn is_workspace_scoped(self) -> bool {
        matches!(
            self,
            Self::Tasks | Self::Statuses | Self::Priorities | Self::Attachments
        )
    }
}

impl TryFrom<&str> for StoreName {
    type Error = ParseStoreNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "tasks" => Ok(Self::Tasks),
            "statuses" => Ok(Self::Statuses),
            "tags" => Ok(Self::Tags),
            "priorities" => Ok(Self::Priorities),
            "workspaces" => Ok(Self::Workspaces),
            "attachments" => Ok(Self::Attachments),
            "settings" => Ok(Self::Settings),
            _ => Err(ParseStoreNameError(value.to_owned())),
        }
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
