//! Typed entity access over the storage engine.

use super::{Entity, Ranked, WorkspaceId, WorkspaceScoped};
use crate::storage::{
    domain::{Record, StorageResult},
    ports::{ObjectStore, StoreTransaction},
    services::StorageEngine,
};
use chrono::{DateTime, Utc};
use std::marker::PhantomData;
use tracing::warn;

/// Repository converting between typed entities and stored records.
///
/// Multi-record operations each run in a single transaction.
pub struct EntityRepository<E, S: ObjectStore> {
    engine: StorageEngine<S>,
    entity: PhantomData<fn() -> E>,
}

impl<E, S: ObjectStore> Clone for EntityRepository<E, S> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            entity: PhantomData,
        }
    }
}

/// Decodes every record that fits `E`, logging and skipping the rest.
fn decode_all<E: Entity>(records: Vec<Record>) -> Vec<E> {
    records
        .into_iter()
        .filter_map(|record| {
            let key = record.key(E::STORE).unwrap_or_default().to_owned();
            record
                .into_entity()
                .inspect_err(|err| {
                    warn!(store = %E::STORE, %key, error = %err, "skipping undecodable record");
                })
                .ok()
        })
        .collect()
}

fn load<E: Entity>(tx: &mut dyn StoreTransaction, id: &str) -> StorageResult<Option<E>> {
    tx.get(E::STORE, id)?.map(Record::into_entity).transpose()
}

impl<E: Entity, S: ObjectStore> EntityRepository<E, S> {
    /// Creates a repository over the given engine.
    #[must_use]
    pub const fn new(engine: StorageEngine<S>) -> Self {
        Self {
            engine,
            entity: PhantomData,
        }
    }

    /// Returns the underlying engine.
    #[must_use]
    pub const fn engine(&self) -> &StorageEngine<S> {
        &self.engine
    }

    /// Returns every entity in insertion order.
    ///
    /// Records that do not decode are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the store cannot be read.
    pub async fn list(&self) -> StorageResult<Vec<E>> {
        Ok(decode_all(self.engine.get_all(E::STORE).await?))
    }

    /// Returns one entity by identifier.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the store cannot be read or the record
    /// does not decode.
    pub async fn find(&self, id: &str) -> StorageResult<Option<E>> {
        self.engine
            .get(E::STORE, id)
            .await?
            .map(Record::into_entity)
            .transpose()
    }

    /// Inserts a new entity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::domain::StorageError::DuplicateKey`] when the
    /// identifier is taken.
    pub async fn insert(&self, entity: &E) -> StorageResult<()> {
        self.engine
            .add(E::STORE, Record::from_entity(entity)?)
            .await
    }

    /// Inserts or replaces an entity.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the record cannot be written.
    pub async fn save(&self, entity: &E) -> StorageResult<()> {
        self.engine
            .put(E::STORE, Record::from_entity(entity)?)
            .await
    }

    /// Deletes an entity; unknown identifiers are ignored.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the store cannot be written.
    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.engine.delete(E::STORE, id).await
    }

    /// Applies a patch atomically.
    ///
    /// Returns `None` when no entity has the identifier.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the record cannot be read or written.
    pub async fn modify(
        &self,
        id: &str,
        patch: E::Patch,
        now: DateTime<Utc>,
    ) -> StorageResult<Option<E>> {
        let key = id.to_owned();
        self.engine
            .write(move |tx| {
                let Some(mut entity) = load::<E>(tx, &key)? else {
                    return Ok(None);
                };
                entity.apply_patch(patch, now);
                tx.put(E::STORE, Record::from_entity(&entity)?)?;
                Ok(Some(entity))
            })
            .await
    }

    /// Inserts `seeds` if the scope has no entities yet.
    ///
    /// The check and the inserts share one transaction. Returns whether the
    /// seeds were written.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the store cannot be read or written.
    pub async fn insert_if_empty(
        &self,
        scope: Option<&WorkspaceId>,
        seeds: Vec<E>,
    ) -> StorageResult<bool> {
        let owned_scope = scope.cloned();
        self.engine
            .write(move |tx| {
                let existing = match &owned_scope {
                    Some(workspace) => tx.get_all_by_workspace(E::STORE, workspace.as_str())?,
                    None => tx.get_all(E::STORE)?,
                };
                if !existing.is_empty() {
                    return Ok(false);
                }
                for seed in &seeds {
                    tx.add(E::STORE, Record::from_entity(seed)?)?;
                }
                Ok(true)
            })
            .await
    }
}

impl<E: WorkspaceScoped, S: ObjectStore> EntityRepository<E, S> {
    /// Returns the entities of one workspace in insertion order.
    ///
    /// Records that do not decode are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the store cannot be read.
    pub async fn list_in(&self, workspace_id: &WorkspaceId) -> StorageResult<Vec<E>> {
        Ok(decode_all(
            self.engine
                .get_all_by_workspace(E::STORE, workspace_id.as_str())
                .await?,
        ))
    }
}

impl<E: Ranked, S: ObjectStore> EntityRepository<E, S> {
    /// Inserts an entity, placing it after its workspace's current last
    /// entry unless `explicit_order` is given.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the store cannot be read or written.
    pub async fn insert_with_next_order(
        &self,
        mut entity: E,
        explicit_order: Option<u32>,
    ) -> StorageResult<E> {
        self.engine
            .write(move |tx| {
                let order = match explicit_order {
                    Some(order) => order,
                    None => {
                        let siblings: Vec<E> = decode_all(
                            tx.get_all_by_workspace(E::STORE, entity.workspace_id().as_str())?,
                        );
                        siblings
                            .iter()
                            .map(Ranked::order)
                            .max()
                            .map_or(0, |last| last.saturating_add(1))
                    }
                };
                entity.set_order(order);
                tx.add(E::STORE, Record::from_entity(&entity)?)?;
                Ok(entity)
            })
            .await
    }

    /// Sets each listed entity's order to its position in `ids`.
    ///
    /// Unknown identifiers are skipped and unlisted entities keep their
    /// order. Returns how many entities were updated.
    ///
    /// # Errors
    ///
    /// Returns a storage error when any record cannot be read or written;
    /// no order changes in that case.
    pub async fn reorder(&self, ids: Vec<E::Id>) -> StorageResult<usize> {
        self.engine
            .write(move |tx| {
                let mut updated = 0;
                for (position, id) in (0_u32..).zip(ids.iter()) {
                    let Some(mut entity) = load::<E>(tx, id.as_ref())? else {
                        continue;
                    };
                    entity.set_order(position);
                    tx.put(E::STORE, Record::from_entity(&entity)?)?;
                    updated += 1;
                }
                Ok(updated)
            })
            .await
    }
}
