//! Typed access to the `settings` store.

use super::Language;
use crate::entity::{ServiceResult, WorkspaceId};
use crate::storage::{domain::SettingKey, ports::ObjectStore, services::StorageEngine};
use serde::de::DeserializeOwned;
use tracing::{error, warn};

/// Reads and writes user preferences.
///
/// App name and icon are stored per workspace; language and the current
/// workspace are shared.
pub struct SettingsService<S: ObjectStore> {
    engine: StorageEngine<S>,
}

impl<S: ObjectStore> Clone for SettingsService<S> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<S: ObjectStore> SettingsService<S> {
    /// Creates a settings service.
    #[must_use]
    pub const fn new(engine: StorageEngine<S>) -> Self {
        Self { engine }
    }

    async fn read<T: DeserializeOwned>(&self, key: &SettingKey) -> Option<T> {
        self.engine
            .get_setting(key)
            .await
            .inspect_err(|err| warn!(%key, error = %err, "failed to read setting"))
            .ok()
            .flatten()
    }

    async fn write(&self, key: &SettingKey, value: &str) -> ServiceResult<()> {
        self.engine
            .put_setting(key, value)
            .await
            .inspect_err(|err| error!(%key, error = %err, "failed to write setting"))?;
        Ok(())
    }

    async fn remove(&self, key: &SettingKey) -> ServiceResult<()> {
        self.engine
            .delete_setting(key)
            .await
            .inspect_err(|err| error!(%key, error = %err, "failed to delete setting"))?;
        Ok(())
    }

    /// Returns the display name of a workspace's app header.
    pub async fn app_name(&self, workspace_id: &WorkspaceId) -> Option<String> {
        self.read(&SettingKey::app_name(workspace_id.as_str())).await
    }

    /// Sets the display name of a workspace's app header.
    ///
    /// # Errors
    ///
    /// Returns [`crate::entity::ServiceError::Storage`] when the setting
    /// cannot be written.
    pub async fn set_app_name(&self, workspace_id: &WorkspaceId, name: &str) -> ServiceResult<()> {
        self.write(&SettingKey::app_name(workspace_id.as_str()), name)
            .await
    }

    /// Returns a workspace's icon.
    pub async fn app_icon(&self, workspace_id: &WorkspaceId) -> Option<String> {
        self.read(&SettingKey::app_icon(workspace_id.as_str())).await
    }

    /// Sets a workspace's icon; `None` removes it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::entity::ServiceError::Storage`] when the setting
    /// cannot be written.
    pub async fn set_app_icon(
        &self,
        workspace_id: &WorkspaceId,
        icon: Option<&str>,
    ) -> ServiceResult<()> {
        let key = SettingKey::app_icon(workspace_id.as_str());
        let Some(value) = icon else {
            return self.remove(&key).await;
        };
        self.write(&key, value).await
    }

    /// Returns the stored language, or English when none is stored or the
    /// stored code is unsupported.
    pub async fn language(&self) -> Language {
        self.stored_language().await.unwrap_or_default()
    }

    /// Returns the stored language, else the language of `locale`, else
    /// English.
    pub async fn language_or_locale(&self, locale: Option<&str>) -> Language {
        self.stored_language()
            .await
            .or_else(|| locale.and_then(Language::from_locale))
            .unwrap_or_default()
    }

    async fn stored_language(&self) -> Option<Language> {
        let code: String = self.read(&SettingKey::Language).await?;
        code.parse::<Language>()
            .inspect_err(|err| warn!(error = %err, "ignoring stored language"))
            .ok()
    }

    /// Stores the language.
    ///
    /// # Errors
    ///
    /// Returns [`crate::entity::ServiceError::Storage`] when the setting
    /// cannot be written.
    pub async fn set_language(&self, language: Language) -> ServiceResult<()> {
        self.write(&SettingKey::Language, language.code()).await
    }

    /// Returns the workspace selected last.
    pub async fn current_workspace(&self) -> Option<WorkspaceId> {
        self.read::<String>(&SettingKey::CurrentWorkspace)
            .await
            .map(WorkspaceId::from)
    }

    /// Remembers the selected workspace.
    ///
    /// # Errors
    ///
    /// Returns [`crate::entity::ServiceError::Storage`] when the setting
    /// cannot be written.
    pub async fn set_current_workspace(&self, workspace_id: &WorkspaceId) -> ServiceResult<()> {
        self.write(&SettingKey::CurrentWorkspace, workspace_id.as_str())
            .await
    }
}
