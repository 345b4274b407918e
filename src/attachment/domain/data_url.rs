//! `data:` URL codec for attachment payloads.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Media type recorded when a file declares none.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Errors raised while decoding a data URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataUrlError {
    /// The text does not start with `data:`.
    #[error("not a data URL: missing 'data:' prefix")]
    MissingScheme,
    /// There is no `,` separating the header from the payload.
    #[error("data URL has no payload separator")]
    MissingPayload,
    /// The payload is flagged as base64 but does not decode.
    #[error("data URL payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// A decoded `data:<media type>[;base64],<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    media_type: String,
    bytes: Vec<u8>,
}

impl DataUrl {
    /// Wraps raw bytes; an empty media type becomes
    /// [`DEFAULT_MEDIA_TYPE`].
    #[must_use]
    pub fn new(declared_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let declared = declared_type.into();
        let media_type = if declared.trim().is_empty() {
            DEFAULT_MEDIA_TYPE.to_owned()
        } else {
            declared
        };
        Self { media_type, bytes }
    }

    /// Returns the media type without parameters.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Returns the payload.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the URL, returning media type and payload.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.media_type, self.bytes)
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SCHEME}{}{BASE64_MARKER},{}",
            self.media_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

impl FromStr for DataUrl {
    type Err = DataUrlError;

    /// Parses base64 and plain data URLs. Parameters such as `charset`
    /// are dropped; plain payloads are taken byte for byte.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let rest = raw.strip_prefix(SCHEME).ok_or(DataUrlError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingPayload)?;
        let (params, is_base64) = header
            .strip_suffix(BASE64_MARKER)
            .map_or((header, false), |stripped| (stripped, true));
        let media_type = params.split(';').next().unwrap_or_default();
        let bytes = if is_base64 {
            STANDARD.decode(payload.trim())?
        } else {
            payload.as_bytes().to_vec()
        };
        Ok(Self::new(media_type, bytes))
    }
}
