//! Image load error types.

use thiserror::Error;

/// Reasons an image load attempt ends without an image.
///
/// Every variant renders the same placeholder; the distinction only shows up
/// in logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum LoadError {
    #[error("invalid image URL {input:?}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("failed to decode image: {message}")]
    Decode { message: String },
}

impl LoadError {
    /// Creates invalid URL error.
    #[must_use]
    pub fn invalid_url(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Short label used in log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::Network { .. } => "network",
            Self::Decode { .. } => "decode",
        }
    }
}
