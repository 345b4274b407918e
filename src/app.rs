//! Application facade wiring every service over one storage engine.

use crate::attachment::services::AttachmentStore;
use crate::config::TasklyticsConfig;
use crate::entity::{Entity, ServiceError, ServiceResult, WorkspaceId};
use crate::settings::SettingsService;
use crate::storage::{adapters::ConfiguredObjectStore, ports::ObjectStore, services::StorageEngine};
use crate::task::services::TaskService;
use crate::taxonomy::services::{PriorityService, StatusService, TagService};
use crate::workspace::{
    domain::{NewWorkspace, Workspace},
    services::WorkspaceService,
};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tracing::info;

/// Entry point to the persistence core.
///
/// Cloning is cheap; clones share the engine and the seeding guards.
pub struct Tasklytics<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    engine: StorageEngine<S>,
    tasks: TaskService<S, C>,
    statuses: StatusService<S, C>,
    priorities: PriorityService<S, C>,
    tags: TagService<S, C>,
    workspaces: WorkspaceService<S, C>,
    attachments: AttachmentStore<S, C>,
    settings: SettingsService<S>,
}

impl<S, C> Clone for Tasklytics<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            tasks: self.tasks.clone(),
            statuses: self.statuses.clone(),
            priorities: self.priorities.clone(),
            tags: self.tags.clone(),
            workspaces: self.workspaces.clone(),
            attachments: self.attachments.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl Tasklytics<ConfiguredObjectStore, DefaultClock> {
    /// Opens the database the configuration points at, using the system
    /// clock.
    #[must_use]
    pub fn from_config(config: &TasklyticsConfig) -> Self {
        Self::new(
            StorageEngine::new(ConfiguredObjectStore::from_config(config)),
            Arc::new(DefaultClock),
        )
    }
}

impl<S, C> Tasklytics<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    /// Builds every service over `engine`.
    #[must_use]
    pub fn new(engine: StorageEngine<S>, clock: Arc<C>) -> Self {
        Self {
            tasks: TaskService::new(engine.clone(), Arc::clone(&clock)),
            statuses: StatusService::new(engine.clone(), Arc::clone(&clock)),
            priorities: PriorityService::new(engine.clone(), Arc::clone(&clock)),
            tags: TagService::new(engine.clone(), Arc::clone(&clock)),
            workspaces: WorkspaceService::new(engine.clone(), Arc::clone(&clock)),
            attachments: AttachmentStore::new(engine.clone(), clock),
            settings: SettingsService::new(engine.clone()),
            engine,
        }
    }

    /// Returns the shared storage engine.
    #[must_use]
    pub const fn engine(&self) -> &StorageEngine<S> {
        &self.engine
    }

    /// Returns the task service.
    #[must_use]
    pub const fn tasks(&self) -> &TaskService<S, C> {
        &self.tasks
    }

    /// Returns the status service.
    #[must_use]
    pub const fn statuses(&self) -> &StatusService<S, C> {
        &self.statuses
    }

    /// Returns the priority service.
    #[must_use]
    pub const fn priorities(&self) -> &PriorityService<S, C> {
        &self.priorities
    }

    /// Returns the tag service.
    #[must_use]
    pub const fn tags(&self) -> &TagService<S, C> {
        &self.tags
    }

    /// Returns the workspace service.
    #[must_use]
    pub const fn workspaces(&self) -> &WorkspaceService<S, C> {
        &self.workspaces
    }

    /// Returns the attachment store.
    #[must_use]
    pub const fn attachments(&self) -> &AttachmentStore<S, C> {
        &self.attachments
    }

    /// Returns the settings service.
    #[must_use]
    pub const fn settings(&self) -> &SettingsService<S> {
        &self.settings
    }

    /// Prepares the database for first use and returns the workspace to
    /// open.
    ///
    /// Upgrades the schema, creates the default workspace when there is
    /// none, remembers the chosen workspace and seeds its statuses and
    /// priorities together with the global tags.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the database cannot be opened,
    /// or [`ServiceError::NotFound`] when no workspace can be read back.
    pub async fn bootstrap(&self) -> ServiceResult<Workspace> {
        self.engine.init().await?;
        let preferred = self.settings.current_workspace().await;
        let workspace = self
            .workspaces
            .resolve_current(preferred.as_ref())
            .await
            .ok_or_else(|| ServiceError::not_found("workspace", "current"))?;
        if preferred.as_ref() != Some(workspace.id()) {
            self.settings.set_current_workspace(workspace.id()).await?;
        }
        self.seed(workspace.id()).await;
        info!(workspace_id = %workspace.id(), name = workspace.name(), "workspace opened");
        Ok(workspace)
    }

    /// Makes another workspace current and seeds it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown workspace, or
    /// [`ServiceError::Storage`] when the choice cannot be stored.
    pub async fn switch_workspace(&self, id: &WorkspaceId) -> ServiceResult<Workspace> {
        let workspace = self
            .workspaces
            .find(id)
            .await
            .ok_or_else(|| ServiceError::not_found("workspace", id.as_str()))?;
        self.settings.set_current_workspace(id).await?;
        self.seed(id).await;
        Ok(workspace)
    }

    /// Creates a workspace with the default statuses and priorities.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the workspace cannot be
    /// stored.
    pub async fn create_workspace(&self, request: NewWorkspace) -> ServiceResult<Workspace> {
        let workspace = self.workspaces.create(request).await?;
        self.seed(workspace.id()).await;
        Ok(workspace)
    }

    async fn seed(&self, workspace_id: &WorkspaceId) {
        tokio::join!(
            self.statuses.ensure_defaults(workspace_id),
            self.priorities.ensure_defaults(workspace_id),
            self.tags.ensure_defaults(),
        );
    }
}
