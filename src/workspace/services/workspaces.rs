//! Service for workspaces.

use super::cascade::{CascadeSummary, cascade_delete};
use crate::entity::{
    Entity, EntityRepository, GLOBAL_SCOPE, SeedGuard, ServiceError, ServiceResult, WorkspaceId,
};
use crate::storage::{ports::ObjectStore, services::StorageEngine};
use crate::workspace::domain::{NewWorkspace, Workspace, WorkspacePatch};
use mockable::Clock;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Workspace management, including the cascading delete.
pub struct WorkspaceService<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    repository: EntityRepository<Workspace, S>,
    seeding: SeedGuard,
    clock: Arc<C>,
}

impl<S, C> Clone for WorkspaceService<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            seeding: self.seeding.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> WorkspaceService<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    /// Creates a workspace service.
    #[must_use]
    pub fn new(engine: StorageEngine<S>, clock: Arc<C>) -> Self {
        Self {
            repository: EntityRepository::new(engine),
            seeding: SeedGuard::new(),
            clock,
        }
    }

    /// Returns every workspace in creation order.
    pub async fn list(&self) -> Vec<Workspace> {
        self.repository
            .list()
            .await
            .inspect_err(|err| warn!(error = %err, "failed to list workspaces"))
            .unwrap_or_default()
    }

    /// Returns one workspace.
    pub async fn find(&self, id: &WorkspaceId) -> Option<Workspace> {
        self.repository
            .find(id.as_str())
            .await
            .inspect_err(|err| warn!(%id, error = %err, "failed to load workspace"))
            .ok()
            .flatten()
    }

    /// Creates the first-run workspace when none exists.
    pub async fn ensure_default(&self) -> bool {
        let _held = self.seeding.lock(GLOBAL_SCOPE).await;
        let seed = Workspace::default_at(self.clock.utc());
        let seeded = self
            .repository
            .insert_if_empty(None, vec![seed])
            .await
            .inspect_err(|err| error!(error = %err, "failed to create default workspace"))
            .unwrap_or(false);
        if seeded {
            info!("created default workspace");
        }
        seeded
    }

    /// Creates a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the workspace cannot be
    /// stored.
    pub async fn create(&self, request: NewWorkspace) -> ServiceResult<Workspace> {
        let workspace = request.build(self.clock.utc());
        self.repository
            .insert(&workspace)
            .await
            .inspect_err(|err| error!(error = %err, "failed to create workspace"))?;
        info!(id = %workspace.id(), name = workspace.name(), "workspace created");
        Ok(workspace)
    }

    /// Renames or re-icons a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown identifier, or
    /// [`ServiceError::Storage`] when the workspace cannot be written.
    pub async fn update(&self, id: &WorkspaceId, patch: WorkspacePatch) -> ServiceResult<Workspace> {
        self.repository
            .modify(id.as_str(), patch, self.clock.utc())
            .await
            .inspect_err(|err| error!(%id, error = %err, "failed to update workspace"))?
            .ok_or_else(|| ServiceError::not_found("workspace", id.as_str()))
    }

    /// Deletes a workspace with its tasks, statuses, priorities,
    /// attachments and scoped settings in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] wrapping
    /// [`crate::storage::domain::StorageError::TransactionAborted`] when any
    /// step fails; nothing is deleted in that case.
    pub async fn delete(&self, id: &WorkspaceId) -> ServiceResult<CascadeSummary> {
        let workspace_id = id.as_str().to_owned();
        let summary = self
            .repository
            .engine()
            .write(move |tx| cascade_delete(tx, &workspace_id))
            .await
            .map_err(|err| err.aborted("workspace delete"))
            .inspect_err(|err| error!(%id, error = %err, "failed to delete workspace"))?;
        info!(%id, removed = summary.total(), "workspace deleted");
        Ok(summary)
    }

    /// Picks the workspace to open.
    ///
    /// Creates the default workspace if there is none, then returns
    /// `preferred` when it still exists, else the first workspace.
    pub async fn resolve_current(&self, preferred: Option<&WorkspaceId>) -> Option<Workspace> {
        self.ensure_default().await;
        let workspaces = self.list().await;
        preferred
            .and_then(|wanted| workspaces.iter().find(|workspace| workspace.id() == wanted))
            .or_else(|| workspaces.first())
            .cloned()
    }
}
