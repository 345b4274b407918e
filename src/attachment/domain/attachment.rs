//! Attachment records and the files they carry.

use crate::entity::{AttachmentId, WorkspaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file as handed in by, or back to, the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFile {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl AttachmentFile {
    /// Creates a file from its name, media type and contents.
    #[must_use]
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Returns the file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the media type; may be empty for files of unknown type.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Returns the contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Stored form of an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    id: AttachmentId,
    name: String,
    #[serde(rename = "type", default)]
    media_type: String,
    data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    workspace_id: Option<WorkspaceId>,
}

impl Attachment {
    /// Builds the record for `file`, identified as `<name>-<unix millis>`.
    #[must_use]
    pub fn new(
        file: &AttachmentFile,
        data: String,
        workspace_id: WorkspaceId,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AttachmentId::from(format!("{}-{}", file.name, saved_at.timestamp_millis())),
            name: file.name.clone(),
            media_type: file.media_type.clone(),
            data,
            workspace_id: Some(workspace_id),
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> &AttachmentId {
        &self.id
    }

    /// Returns the original file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the media type declared at upload.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Returns the payload as a data URL.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Returns the owning workspace; records written before workspaces
    /// existed have none.
    #[must_use]
    pub const fn workspace_id(&self) -> Option<&WorkspaceId> {
        self.workspace_id.as_ref()
    }
}
