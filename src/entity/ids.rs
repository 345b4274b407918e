//! String identifiers for persisted entities.
//!
//! Identifiers are opaque strings: generated ones are UUIDv4 text, but ids
//! loaded from storage or imported from a backup are kept verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wraps an existing identifier.
            #[must_use]
            pub fn from_string(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier and returns its text.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

string_id!(
    /// Identifier of a task.
    TaskId
);
string_id!(
    /// Identifier of a status (kanban column).
    StatusId
);
string_id!(
    /// Identifier of a priority level.
    PriorityId
);
string_id!(
    /// Identifier of a tag.
    TagId
);
string_id!(
    /// Identifier of a workspace.
    WorkspaceId
);
string_id!(
    /// Identifier of a stored attachment (`<filename>-<unix millis>`).
    AttachmentId
);

impl StatusId {
    /// Returns `true` for the empty placeholder a task carries when no
    /// status was chosen.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StatusId {
    fn default() -> Self {
        Self(String::new())
    }
}
