//! Attachment domain: stored records and the data-URL codec.

mod attachment;
mod data_url;

pub use attachment::{Attachment, AttachmentFile};
pub use data_url::{DEFAULT_MEDIA_TYPE, DataUrl, DataUrlError};
