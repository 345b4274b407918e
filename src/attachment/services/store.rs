//! Persistence of attachment files.

use crate::attachment::domain::{Attachment, AttachmentFile, DataUrl, DataUrlError};
use crate::entity::{AttachmentId, WorkspaceId};
use crate::storage::{
    domain::{Record, StorageError, StoreName},
    ports::ObjectStore,
    services::StorageEngine,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Errors returned by [`AttachmentStore`].
#[derive(Debug, Clone, Error)]
pub enum AttachmentError {
    /// The storage engine failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A stored payload is not a readable data URL.
    #[error("attachment '{id}' is corrupt: {source}")]
    DataUrl {
        /// Attachment whose payload failed to decode.
        id: AttachmentId,
        /// Decoding failure.
        source: DataUrlError,
    },
}

/// Result type for attachment operations.
pub type AttachmentResult<T> = Result<T, AttachmentError>;

/// Saves files as data URLs in the `attachments` store.
pub struct AttachmentStore<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    engine: StorageEngine<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for AttachmentStore<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

fn ids_of(records: &[Record]) -> AttachmentResult<Vec<AttachmentId>> {
    records
        .iter()
        .map(|record| {
            record
                .key(StoreName::Attachments)
                .map(AttachmentId::from)
                .map_err(AttachmentError::from)
        })
        .collect()
}

impl<S, C> AttachmentStore<S, C>
where
    S: ObjectStore,
    C: Clock + Send + Sync,
{
    /// Creates an attachment store.
    #[must_use]
    pub const fn new(engine: StorageEngine<S>, clock: Arc<C>) -> Self {
        Self { engine, clock }
    }

    /// Stores a file under `<name>-<unix millis>` and returns that id.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::Storage`] wrapping
    /// [`StorageError::DuplicateKey`] when a file of the same name was saved
    /// in the same millisecond, or any other storage failure.
    pub async fn save(
        &self,
        file: &AttachmentFile,
        workspace_id: &WorkspaceId,
    ) -> AttachmentResult<AttachmentId> {
        let data = DataUrl::new(file.media_type(), file.bytes().to_vec()).to_string();
        let attachment = Attachment::new(file, data, workspace_id.clone(), self.clock.utc());
        let id = attachment.id().clone();
        self.engine
            .add(StoreName::Attachments, Record::from_entity(&attachment)?)
            .await
            .inspect_err(|err| {
                error!(%id, %workspace_id, error = %err, "failed to save attachment");
            })?;
        debug!(%id, size = file.bytes().len(), "attachment saved");
        Ok(id)
    }

    /// Loads a file back, or `None` when the id is unknown.
    ///
    /// The media type comes from the data URL; the name from the record.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::DataUrl`] when the stored payload does not
    /// decode, or [`AttachmentError::Storage`] when it cannot be read.
    pub async fn get(&self, id: &AttachmentId) -> AttachmentResult<Option<AttachmentFile>> {
        let Some(record) = self.engine.get(StoreName::Attachments, id.as_str()).await? else {
            return Ok(None);
        };
        let attachment: Attachment = record.into_entity()?;
        let decoded: DataUrl = attachment.data().parse().map_err(|source| {
            error!(%id, "stored attachment is not a data URL");
            AttachmentError::DataUrl {
                id: id.clone(),
                source,
            }
        })?;
        let (media_type, bytes) = decoded.into_parts();
        Ok(Some(AttachmentFile::new(attachment.name(), media_type, bytes)))
    }

    /// Removes an attachment; unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::Storage`] when the store cannot be written.
    pub async fn delete(&self, id: &AttachmentId) -> AttachmentResult<()> {
        self.engine
            .delete(StoreName::Attachments, id.as_str())
            .await
            .inspect_err(|err| error!(%id, error = %err, "failed to delete attachment"))?;
        Ok(())
    }

    /// Lists every attachment id in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::Storage`] when the store cannot be read.
    pub async fn all_ids(&self) -> AttachmentResult<Vec<AttachmentId>> {
        ids_of(&self.engine.get_all(StoreName::Attachments).await?)
    }

    /// Lists the attachment ids of one workspace.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::Storage`] when the store cannot be read.
    pub async fn ids_in(&self, workspace_id: &WorkspaceId) -> AttachmentResult<Vec<AttachmentId>> {
        ids_of(
            &self
                .engine
                .get_all_by_workspace(StoreName::Attachments, workspace_id.as_str())
                .await?,
        )
    }
}
