//! Keys of the `settings` store.
//!
//! Per-workspace preferences embed the workspace identifier in the key
//! (`appName_<workspaceId>`); cross-workspace preferences use a fixed key.

use std::fmt;

const APP_NAME: &str = "appName";
const APP_ICON: &str = "appIcon";
const LANGUAGE: &str = "language";
const CURRENT_WORKSPACE: &str = "currentWorkspaceId";

/// A well-known settings key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Display name of a workspace.
    AppName(String),
    /// Icon (URL or data URL) of a workspace.
    AppIcon(String),
    /// Interface language, shared by all workspaces.
    Language,
    /// Workspace selected when the application last ran.
    CurrentWorkspace,
    /// Unscoped app name written before workspaces existed.
    LegacyAppName,
    /// Unscoped app icon written before workspaces existed.
    LegacyAppIcon,
}

impl SettingKey {
    /// Returns the app-name key for a workspace.
    #[must_use]
    pub fn app_name(workspace_id: impl Into<String>) -> Self {
        Self::AppName(workspace_id.into())
    }

    /// Returns the app-icon key for a workspace.
    #[must_use]
    pub fn app_icon(workspace_id: impl Into<String>) -> Self {
        Self::AppIcon(workspace_id.into())
    }

    /// Parses a raw settings key.
    ///
    /// Returns `None` for keys this crate does not interpret.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            APP_NAME => return Some(Self::LegacyAppName),
            APP_ICON => return Some(Self::LegacyAppIcon),
            LANGUAGE => return Some(Self::Language),
            CURRENT_WORKSPACE => return Some(Self::CurrentWorkspace),
            _ => {}
        }
        let (prefix, workspace_id) = raw.split_once('_')?;
        if workspace_id.is_empty() {
            return None;
        }
        match prefix {
            APP_NAME => Some(Self::app_name(workspace_id)),
            APP_ICON => Some(Self::app_icon(workspace_id)),
            _ => None,
        }
    }

    /// Returns the workspace a scoped key belongs to.
    #[must_use]
    pub fn workspace_id(&self) -> Option<&str> {
        match self {
            Self::AppName(id) | Self::AppIcon(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppName(id) => write!(f, "{APP_NAME}_{id}"),
            Self::AppIcon(id) => write!(f, "{APP_ICON}_{id}"),
            Self::Language => f.write_str(LANGUAGE),
            Self::CurrentWorkspace => f.write_str(CURRENT_WORKSPACE),
            Self::LegacyAppName => f.write_str(APP_NAME),
            Self::LegacyAppIcon => f.write_str(APP_ICON),
        }
    }
}
