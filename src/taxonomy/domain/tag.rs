//! Tags: labels shared by every workspace.

use crate::entity::{DomainError, Entity, HexColor, TagId};
use crate::storage::domain::StoreName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_TAGS: [(&str, &str); 3] = [
    ("Personal", "#22c55e"),
    ("Learning", "#eab308"),
    ("Work", "#3b82f6"),
];

/// A coloured label attached to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    id: TagId,
    name: String,
    color: HexColor,
    created_at: DateTime<Utc>,
}

impl Tag {
    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the colour.
    #[must_use]
    pub const fn color(&self) -> &HexColor {
        &self.color
    }

    /// Returns the creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn seeds(now: DateTime<Utc>) -> Vec<Self> {
        DEFAULT_TAGS
            .iter()
            .map(|(name, color)| Self {
                id: TagId::generate(),
                name: (*name).to_owned(),
                color: HexColor::trusted(color),
                created_at: now,
            })
            .collect()
    }
}

/// Fields accepted when creating a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDraft {
    name: String,
    color: Option<HexColor>,
}

impl TagDraft {
    /// Creates a draft with a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    /// Sets the colour.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidColor`] for a malformed colour.
    pub fn with_color(mut self, color: impl Into<String>) -> Result<Self, DomainError> {
        self.color = Some(HexColor::parse(color)?);
        Ok(self)
    }

    /// Builds the tag with a fresh identifier.
    #[must_use]
    pub fn build(self, now: DateTime<Utc>) -> Tag {
        Tag {
            id: TagId::generate(),
            name: self.name,
            color: self.color.unwrap_or_default(),
            created_at: now,
        }
    }
}

/// Partial update of a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPatch {
    name: Option<String>,
    color: Option<HexColor>,
}

impl TagPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the tag.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Recolours the tag.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidColor`] for a malformed colour.
    pub fn with_color(mut self, color: impl Into<String>) -> Result<Self, DomainError> {
        self.color = Some(HexColor::parse(color)?);
        Ok(self)
    }
}

impl Entity for Tag {
    type Id = TagId;
    type Patch = TagPatch;

    const STORE: StoreName = StoreName::Tags;
    const KIND: &'static str = "tag";

    fn id(&self) -> &TagId {
        &self.id
    }

    fn apply_patch(&mut self, patch: TagPatch, _now: DateTime<Utc>) {
        let TagPatch { name, color } = patch;
        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = color {
            self.color = value;
        }
    }
}
