//! Task aggregate and its create/update requests.

use crate::entity::{
    AttachmentId, Entity, PriorityId, StatusId, TagId, TaskId, WorkspaceId, WorkspaceScoped,
};
use crate::storage::domain::StoreName;
use crate::taxonomy::domain::{Priority, Status};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A unit of work inside a workspace.
///
/// `status_id` and `priority_id` are soft references: the referenced status
/// or priority may have been deleted, in which case lookups resolve to
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status_id: StatusId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority_id: Option<PriorityId>,
    #[serde(default)]
    tags: Vec<TagId>,
    #[serde(default)]
    attachments: Vec<AttachmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadline: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    workspace_id: WorkspaceId,
}

impl Task {
    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the markdown description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status reference, which may be empty.
    #[must_use]
    pub const fn status_id(&self) -> &StatusId {
        &self.status_id
    }

    /// Returns the priority reference.
    #[must_use]
    pub const fn priority_id(&self) -> Option<&PriorityId> {
        self.priority_id.as_ref()
    }

    /// Returns the tag references.
    #[must_use]
    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// Returns the attachment references in display order.
    #[must_use]
    pub fn attachments(&self) -> &[AttachmentId] {
        &self.attachments
    }

    /// Returns the deadline exactly as stored.
    #[must_use]
    pub fn deadline(&self) -> Option<&str> {
        self.deadline.as_deref()
    }

    /// Returns the deadline as an instant.
    ///
    /// Accepts RFC 3339 timestamps, zone-less `YYYY-MM-DDTHH:MM[:SS]` local
    /// date-times (read as UTC) and bare dates (midnight UTC). Unparseable
    /// values yield `None`.
    #[must_use]
    pub fn deadline_at(&self) -> Option<DateTime<Utc>> {
        self.deadline.as_deref().and_then(parse_deadline)
    }

    /// Returns the creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the time of the last change.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Resolves the task's status among `statuses`.
    #[must_use]
    pub fn status_in<'a>(&self, statuses: &'a [Status]) -> Option<&'a Status> {
        statuses.iter().find(|status| status.id() == &self.status_id)
    }

    /// Resolves the task's priority among `priorities`.
    #[must_use]
    pub fn priority_in<'a>(&self, priorities: &'a [Priority]) -> Option<&'a Priority> {
        let wanted = self.priority_id.as_ref()?;
        priorities.iter().find(|priority| priority.id() == wanted)
    }

    /// Returns `true` when the task carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &TagId) -> bool {
        self.tags.contains(tag)
    }
}

fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn dedupe_tags(tags: Vec<TagId>) -> Vec<TagId> {
    let mut unique: Vec<TagId> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

/// Fields accepted when creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: String,
    status_id: StatusId,
    priority_id: Option<PriorityId>,
    tags: Vec<TagId>,
    attachments: Vec<AttachmentId>,
    deadline: Option<String>,
}

impl NewTask {
    /// Creates a request with a title and every other field empty.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the markdown description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status_id: impl Into<StatusId>) -> Self {
        self.status_id = status_id.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority_id: impl Into<PriorityId>) -> Self {
        self.priority_id = Some(priority_id.into());
        self
    }

    /// Sets the tags; duplicates are collapsed.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the attachments in display order.
    #[must_use]
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = AttachmentId>) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Builds the task with a fresh identifier.
    #[must_use]
    pub fn build(self, workspace_id: WorkspaceId, now: DateTime<Utc>) -> Task {
        let Self {
            title,
            description,
            status_id,
            priority_id,
            tags,
            attachments,
            deadline,
        } = self;
        Task {
            id: TaskId::generate(),
            title,
            description,
            status_id,
            priority_id: priority_id.filter(|id| !id.as_str().is_empty()),
            tags: dedupe_tags(tags),
            attachments,
            deadline: deadline.filter(|value| !value.is_empty()),
            created_at: now,
            updated_at: now,
            workspace_id,
        }
    }
}

/// Partial update of a task. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<String>,
    status_id: Option<StatusId>,
    priority_id: Option<Option<PriorityId>>,
    tags: Option<Vec<TagId>>,
    attachments: Option<Vec<AttachmentId>>,
    deadline: Option<Option<String>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Moves the task to another status.
    #[must_use]
    pub fn with_status(mut self, status_id: impl Into<StatusId>) -> Self {
        self.status_id = Some(status_id.into());
        self
    }

    /// Replaces the priority; `None` clears it.
    #[must_use]
    pub fn with_priority(mut self, priority_id: Option<PriorityId>) -> Self {
        self.priority_id = Some(priority_id);
        self
    }

    /// Replaces the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Replaces the attachment list.
    #[must_use]
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = AttachmentId>) -> Self {
        self.attachments = Some(attachments.into_iter().collect());
        self
    }

    /// Replaces the deadline; `None` clears it.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<String>) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

impl Entity for Task {
    type Id = TaskId;
    type Patch = TaskPatch;

    const STORE: StoreName = StoreName::Tasks;
    const KIND: &'static str = "task";

    fn id(&self) -> &TaskId {
        &self.id
    }

    fn apply_patch(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        let TaskPatch {
            title,
            description,
            status_id,
            priority_id,
            tags,
            attachments,
            deadline,
        } = patch;
        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = status_id {
            self.status_id = value;
        }
        if let Some(value) = priority_id {
            self.priority_id = value;
        }
        if let Some(value) = tags {
            self.tags = dedupe_tags(value);
        }
        if let Some(value) = attachments {
            self.attachments = value;
        }
        if let Some(value) = deadline {
            self.deadline = value;
        }
        let floor = self.updated_at + TimeDelta::microseconds(1);
        self.updated_at = now.max(floor);
    }
}

impl WorkspaceScoped for Task {
    fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }
}
