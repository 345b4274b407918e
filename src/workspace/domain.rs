//! Workspace entity.

use crate::entity::{Entity, WorkspaceId};
use crate::storage::domain::StoreName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the workspace created on first run.
pub const DEFAULT_WORKSPACE_NAME: &str = "My Workspace";

/// Icon of new workspaces when none is given.
pub const DEFAULT_WORKSPACE_ICON: &str = "/logo.webp";

/// Name of workspaces created without one.
pub const NEW_WORKSPACE_NAME: &str = "New Workspace";

/// An isolated set of tasks, statuses, priorities and attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    id: WorkspaceId,
    name: String,
    #[serde(default)]
    icon: Option<String>,
    created_at: DateTime<Utc>,
}

impl Workspace {
    /// Creates a workspace with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, icon: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self::restore(WorkspaceId::generate(), name, icon, created_at)
    }

    /// Rebuilds a workspace from known field values.
    #[must_use]
    pub fn restore(
        id: WorkspaceId,
        name: impl Into<String>,
        icon: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            icon,
            created_at,
        }
    }

    /// Creates the first-run workspace.
    #[must_use]
    pub fn default_at(created_at: DateTime<Utc>) -> Self {
        Self::new(
            DEFAULT_WORKSPACE_NAME,
            Some(DEFAULT_WORKSPACE_ICON.to_owned()),
            created_at,
        )
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the icon URL or data URL.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Fields accepted when creating a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewWorkspace {
    name: Option<String>,
    icon: Option<String>,
}

impl NewWorkspace {
    /// Creates a request that uses the defaults for every field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Builds the workspace, replacing empty fields with defaults.
    #[must_use]
    pub fn build(self, created_at: DateTime<Utc>) -> Workspace {
        let name = self
            .name
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| NEW_WORKSPACE_NAME.to_owned());
        let icon = self
            .icon
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_WORKSPACE_ICON.to_owned());
        Workspace::new(name, Some(icon), created_at)
    }
}

/// Partial update of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspacePatch {
    name: Option<String>,
    icon: Option<Option<String>>,
}

impl WorkspacePatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the workspace.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the icon; `None` clears it.
    #[must_use]
    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = Some(icon);
        self
    }
}

impl Entity for Workspace {
    type Id = WorkspaceId;
    type Patch = WorkspacePatch;

    const STORE: StoreName = StoreName::Workspaces;
    const KIND: &'static str = "workspace";

    fn id(&self) -> &WorkspaceId {
        &self.id
    }

    fn apply_patch(&mut self, patch: WorkspacePatch, _now: DateTime<Utc>) {
        let WorkspacePatch { name, icon } = patch;
        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = icon {
            self.icon = value;
        }
    }
}
