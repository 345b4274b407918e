//! Statuses and priorities: named, coloured, ordered per workspace.

use crate::entity::{
    DomainError, Entity, HexColor, PriorityId, Ranked, StatusId, WorkspaceId, WorkspaceScoped,
};
use crate::storage::domain::StoreName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Built-in entry created when a workspace has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedSeed {
    /// Display name.
    pub name: &'static str,
    /// Colour as `#rrggbb`.
    pub color: &'static str,
    /// Display position.
    pub order: u32,
}

/// A ranked taxonomy entry that can be created from a draft.
pub trait RankedEntity: Ranked<Patch = RankedPatch> {
    /// Entries seeded into an empty workspace.
    const DEFAULTS: &'static [RankedSeed];

    /// Builds a new entry with a fresh identifier.
    fn create(
        name: String,
        color: HexColor,
        order: u32,
        workspace_id: WorkspaceId,
        created_at: DateTime<Utc>,
    ) -> Self;
}

/// Fields accepted when creating a status or priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedDraft {
    name: Option<String>,
    color: Option<HexColor>,
    order: Option<u32>,
}

impl RankedDraft {
    /// Creates a draft with a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
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

    /// Places the entry at an explicit position instead of last.
    #[must_use]
    pub const fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns the requested position, if any.
    #[must_use]
    pub const fn order(&self) -> Option<u32> {
        self.order
    }

    /// Builds the entry; the order is settled by the repository.
    #[must_use]
    pub fn build<E: RankedEntity>(self, workspace_id: WorkspaceId, now: DateTime<Utc>) -> E {
        E::create(
            self.name.unwrap_or_default(),
            self.color.unwrap_or_default(),
            self.order.unwrap_or_default(),
            workspace_id,
            now,
        )
    }
}

/// Partial update of a status or priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedPatch {
    name: Option<String>,
    color: Option<HexColor>,
    order: Option<u32>,
}

impl RankedPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the entry.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Recolours the entry.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidColor`] for a malformed colour.
    pub fn with_color(mut self, color: impl Into<String>) -> Result<Self, DomainError> {
        self.color = Some(HexColor::parse(color)?);
        Ok(self)
    }

    /// Moves the entry.
    #[must_use]
    pub const fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

macro_rules! ranked_entity {
    (
        $(#[$meta:meta])*
        $name:ident, $id:ident, $store:expr, $kind:literal, $defaults:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            id: $id,
            name: String,
            color: HexColor,
            order: u32,
            created_at: DateTime<Utc>,
            workspace_id: WorkspaceId,
        }

        impl $name {
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

            /// Returns the display position.
            #[must_use]
            pub const fn order(&self) -> u32 {
                self.order
            }

            /// Returns the creation time.
            #[must_use]
            pub const fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        }

        impl Entity for $name {
            type Id = $id;
            type Patch = RankedPatch;

            const STORE: StoreName = $store;
            const KIND: &'static str = $kind;

            fn id(&self) -> &$id {
                &self.id
            }

            fn apply_patch(&mut self, patch: RankedPatch, _now: DateTime<Utc>) {
                let RankedPatch { name, color, order } = patch;
                if let Some(value) = name {
                    self.name = value;
                }
                if let Some(value) = color {
                    self.color = value;
                }
                if let Some(value) = order {
                    self.order = value;
                }
            }
        }

        impl WorkspaceScoped for $name {
            fn workspace_id(&self) -> &WorkspaceId {
                &self.workspace_id
            }
        }

        impl Ranked for $name {
            fn order(&self) -> u32 {
                self.order
            }

            fn set_order(&mut self, order: u32) {
                self.order = order;
            }
        }

        impl RankedEntity for $name {
            const DEFAULTS: &'static [RankedSeed] = $defaults;

            fn create(
                name: String,
                color: HexColor,
                order: u32,
                workspace_id: WorkspaceId,
                created_at: DateTime<Utc>,
            ) -> Self {
                Self {
                    id: $id::generate(),
                    name,
                    color,
                    order,
                    created_at,
                    workspace_id,
                }
            }
        }
    };
}

const DEFAULT_STATUSES: &[RankedSeed] = &[
    RankedSeed { name: "Backlog", color: "#3b82f6", order: 0 },
    RankedSeed { name: "In Progress", color: "#eab308", order: 1 },
    RankedSeed { name: "Completed", color: "#22c55e", order: 2 },
    RankedSeed { name: "Blocked", color: "#ef4444", order: 3 },
    RankedSeed { name: "Cancelled", color: "#6b7280", order: 4 },
];

const DEFAULT_PRIORITIES: &[RankedSeed] = &[
    RankedSeed { name: "Low", color: "#22c55e", order: 0 },
    RankedSeed { name: "Medium", color: "#eab308", order: 1 },
    RankedSeed { name: "High", color: "#ef4444", order: 2 },
];

ranked_entity!(
    /// A kanban column that tasks move through.
    Status,
    StatusId,
    StoreName::Statuses,
    "status",
    DEFAULT_STATUSES
);

ranked_entity!(
    /// An urgency level a task may carry.
    Priority,
    PriorityId,
    StoreName::Priorities,
    "priority",
    DEFAULT_PRIORITIES
);

/// Builds the seed entries of `E` for a workspace.
pub(crate) fn seeds<E: RankedEntity>(workspace_id: &WorkspaceId, now: DateTime<Utc>) -> Vec<E> {
    E::DEFAULTS
        .iter()
        .map(|seed| {
            E::create(
                seed.name.to_owned(),
                HexColor::trusted(seed.color),
                seed.order,
                workspace_id.clone(),
                now,
            )
        })
        .collect()
}
