//! Service for global tags.

use crate::entity::{
    EntityRepository, GLOBAL_SCOPE, SeedGuard, ServiceError, ServiceResult, TagId,
};
use crate::storage::{ports::ObjectStore, services::StorageEngine};
use crate::taxonomy::domain::{Tag, TagDraft, TagPatch};
use mockable::Clock;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Manages the tags shared by every workspace.
pub struct TagService<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    repository: EntityRepository<Tag, S>,
    seeding: SeedGuard,
    clock: Arc<C>,
}

impl<S, C> Clone for TagService<S, C>
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

impl<S, C> TagService<S, C>
where
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

    /// Returns every tag in insertion order, or nothing when the store
    /// cannot be read.
    pub async fn list(&self) -> Vec<Tag> {
        self.repository
            .list()
            .await
            .inspect_err(|err| warn!(error = %err, "failed to list tags"))
            .unwrap_or_default()
    }

    /// Returns one tag.
    pub async fn find(&self, id: &TagId) -> Option<Tag> {
        self.repository
            .find(id.as_str())
            .await
            .inspect_err(|err| warn!(%id, error = %err, "failed to load tag"))
            .ok()
            .flatten()
    }

    /// Seeds the built-in tags when none exist.
    pub async fn ensure_defaults(&self) -> bool {
        let _held = self.seeding.lock(GLOBAL_SCOPE).await;
        let seeded = self
            .repository
            .insert_if_empty(None, Tag::seeds(self.clock.utc()))
            .await
            .inspect_err(|err| error!(error = %err, "failed to seed tags"))
            .unwrap_or(false);
        if seeded {
            info!("seeded default tags");
        }
        seeded
    }

    /// Creates a tag.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the tag cannot be stored.
    pub async fn create(&self, draft: TagDraft) -> ServiceResult<Tag> {
        let tag = draft.build(self.clock.utc());
        self.repository
            .insert(&tag)
            .await
            .inspect_err(|err| error!(error = %err, "failed to create tag"))?;
        Ok(tag)
    }

    /// Applies a patch to a tag.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown identifier, or
    /// [`ServiceError::Storage`] when the tag cannot be written.
    pub async fn update(&self, id: &TagId, patch: TagPatch) -> ServiceResult<Tag> {
        self.repository
            .modify(id.as_str(), patch, self.clock.utc())
            .await
            .inspect_err(|err| error!(%id, error = %err, "failed to update tag"))?
            .ok_or_else(|| ServiceError::not_found("tag", id.as_str()))
    }

    /// Deletes a tag. Tasks keep their reference to it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] when the tag cannot be deleted.
    pub async fn delete(&self, id: &TagId) -> ServiceResult<()> {
        self.repository
            .delete(id.as_str())
            .await
            .inspect_err(|err| error!(%id, error = %err, "failed to delete tag"))?;
        Ok(())
    }
}
