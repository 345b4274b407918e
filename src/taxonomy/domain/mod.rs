//! Domain model for statuses, priorities and tags.

mod ranked;
mod tag;

pub use ranked::{Priority, RankedDraft, RankedEntity, RankedPatch, RankedSeed, Status};
pub(crate) use ranked::seeds;
pub use tag::{Tag, TagDraft, TagPatch};
