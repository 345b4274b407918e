//! Display colours of statuses, priorities and tags.

use super::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A CSS hexadecimal colour such as `#3b82f6`.
///
/// Values supplied by callers are validated with [`HexColor::parse`]; values
/// read back from storage are trusted as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Colour applied when none is supplied.
    pub const NEUTRAL: &'static str = "#6b7280";

    /// Parses a `#rgb` or `#rrggbb` colour.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidColor`] for anything else.
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| DomainError::InvalidColor(raw.clone()))?;
        let valid_length = matches!(digits.len(), 3 | 6);
        if !valid_length || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidColor(raw));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Returns the neutral grey default.
    #[must_use]
    pub fn neutral() -> Self {
        Self(Self::NEUTRAL.to_owned())
    }

    /// Wraps a colour known to be valid, such as a built-in default.
    pub(crate) fn trusted(value: &str) -> Self {
        Self(value.to_owned())
    }

    /// Returns the colour text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::neutral()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
