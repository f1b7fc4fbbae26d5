//! Wire codec for everything that crosses the broker.

pub mod json;

use core::fmt;

/// Longest payload excerpt carried by a decode error.
pub const PREVIEW_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Encode(String),
    /// The payload could not be read; `preview` is a lossy excerpt of it for the logs.
    Decode { reason: String, preview: String },
}

impl Error {
    pub(crate) fn decode(reason: impl fmt::Display, payload: &[u8]) -> Self {
        let text = String::from_utf8_lossy(payload);
        let mut preview: String = text.chars().take(PREVIEW_LEN).collect();
        if text.chars().nth(PREVIEW_LEN).is_some() {
            preview.push_str("...");
        }

        Self::Decode {
            reason: reason.to_string(),
            preview,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(reason) => write!(f, "cannot encode payload: {}", reason),
            Self::Decode { reason, preview } => write!(f, "cannot decode {:?}: {}", preview, reason),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
