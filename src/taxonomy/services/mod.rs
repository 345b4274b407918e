//! Services for statuses, priorities and tags.

mod ranked;
mod tag;

pub use ranked::{PriorityService, RankedService, StatusService};
pub use tag::TagService;
