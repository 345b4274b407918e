//! Generic machinery shared by the entity services.
//!
//! Entities are typed views over stored records. Each service pairs an
//! [`EntityRepository`] with an injected clock and logs failures the same
//! way: reads degrade to empty results, writes return the error.

mod color;
mod error;
mod ids;
mod repository;
mod seeding;
mod traits;

pub use color::HexColor;
pub use error::{DomainError, ServiceError, ServiceResult};
pub use ids::{AttachmentId, PriorityId, StatusId, TagId, TaskId, WorkspaceId};
pub use repository::EntityRepository;
pub use seeding::{GLOBAL_SCOPE, SeedGuard};
pub use traits::{Entity, Ranked, WorkspaceScoped};
