//! Service for statuses and priorities.

use crate::entity::{EntityRepository, Ranked, SeedGuard, ServiceError, ServiceResult, WorkspaceId};
use crate::storage::{ports::ObjectStore, services::StorageEngine};
use crate::taxonomy::domain::{self, Priority, RankedDraft, RankedEntity, RankedPatch, Status};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Manages one ranked taxonomy (statuses or priorities) per workspace.
pub struct RankedService<E, S, C>
where
    E: RankedEntity,
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    repository: EntityRepository<E, S>,
    seeding: SeedGuard,
    clock: Arc<C>,
}

/// Status management.
pub type StatusService<S, C> = RankedService<Status, S, C>;

/// Priority management.
pub type PriorityService<S, C> = RankedService<Priority, S, C>;

impl<E, S, C> Clone for RankedService<E, S, C>
where
    E: RankedEntity,
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

impl<E, S, C> RankedService<E, S, C>
where
    E: RankedEntity,
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    /// Creates a service over the given engine.
    #[must_use]
    pub fn new(engine: StorageEngine<S>, clock: Arc<C>) -> Self {
        Self {
            repository: EntityRepository::new(engine),
            seeding: SeedGuard::new(),
            clock,
        }
    }

    /// Returns the workspace's entries sorted by order.
    ///
    /// Read failures are logged and yield an empty list.
    pub async fn list(&self, workspace_id: &WorkspaceId) -> Vec<E> {
        let mut entries = self
            .repository
            .list_in(workspace_id)
            .await
            .inspect_err(|err| {
                warn!(kind = E::KIND, %workspace_id, error = %err, "failed to list entries");
            })
            .unwrap_or_default();
        entries.sort_by_key(Ranked::order);
        entries
    }

    /// Returns one entry, or `None` when absent or unreadable.
    pub async fn find(&self, id: &E::Id) -> Option<E> {
        self.repository
            .find(id.as_ref())
            .await
            .inspect_err(|err| warn!(kind = E::KIND, %id, error = %err, "failed to load entry"))
            .ok()
            .flatten()
    }

    /// Seeds the built-in entries when the workspace has none.
    ///
    /// Returns whether seeding happened. Concurrent calls for one
    /// workspace produce a single seed set. Failures are logged and yield
    /// `false`.
    pub async fn ensure_defaults(&self, workspace_id: &WorkspaceId) -> bool {
        let _held = self.seeding.lock(workspace_id.as_str()).await;
        let seeds = domain::seeds::<E>(workspace_id, self.clock.utc());
        match self.repository.insert_if_empty(Some(workspace_id), seeds).await {
            Ok(true) => {
                info!(kind = E::KIND, %workspace_id, "seeded default entries");
                true
            }
            Ok(false) => {
                debug!(kind = E::KIND, %workspace_id, "entries already present");
                false
            }
            Err(err) => {
                error!(kind = E::KIND, %workspace_id, error = %err, "failed to seed entries");
                false
            }
        }
    }

    /// Creates an entry, placing it last unless the draft carries an
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the entry cannot be stored.
    pub async fn create(&self, draft: RankedDraft, workspace_id: &WorkspaceId) -> ServiceResult<E> {
        let explicit_order = draft.order();
        let entry = draft.build::<E>(workspace_id.clone(), self.clock.utc());
        let stored = self
            .repository
            .insert_with_next_order(entry, explicit_order)
            .await
            .inspect_err(|err| {
                error!(kind = E::KIND, %workspace_id, error = %err, "failed to create entry");
            })?;
        Ok(stored)
    }

    /// Applies a patch to an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown identifier, or
    /// [`ServiceError::Storage`] when the entry cannot be written.
    pub async fn update(&self, id: &E::Id, patch: RankedPatch) -> ServiceResult<E> {
        self.repository
            .modify(id.as_ref(), patch, self.clock.utc())
            .await
            .inspect_err(|err| error!(kind = E::KIND, %id, error = %err, "failed to update entry"))?
            .ok_or_else(|| ServiceError::not_found(E::KIND, id.as_ref()))
    }

    /// Deletes an entry. Tasks referring to it are left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the entry cannot be deleted.
    pub async fn delete(&self, id: &E::Id) -> ServiceResult<()> {
        self.repository
            .delete(id.as_ref())
            .await
            .inspect_err(|err| error!(kind = E::KIND, %id, error = %err, "failed to delete entry"))?;
        Ok(())
    }

    /// Gives each listed entry its position in `ids` as its order.
    ///
    /// Runs in one transaction. Unknown identifiers are skipped; returns
    /// how many entries moved.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the transaction fails, in
    /// which case no order changes.
    pub async fn update_order(&self, ids: Vec<E::Id>) -> ServiceResult<usize> {
        let requested = ids.len();
        let updated = self.repository.reorder(ids).await.inspect_err(|err| {
            error!(kind = E::KIND, requested, error = %err, "failed to reorder entries");
        })?;
        Ok(updated)
    }
}
