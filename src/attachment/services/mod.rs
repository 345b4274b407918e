//! Attachment persistence.

mod store;

pub use store::{AttachmentError, AttachmentResult, AttachmentStore};
