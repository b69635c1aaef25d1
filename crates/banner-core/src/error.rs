use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque load-failure payload reported by a banner display component.
///
/// The adapter never interprets this value; it only records it in state and
/// forwards it to the `on_error` callback. `code` is a stable
/// machine-readable tag, `message` is human-readable detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct LoadError {
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl LoadError {
    /// Construct a new load error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build the standard error for a request the network answered with no ad.
    pub fn no_fill() -> Self {
        Self::new("no_fill", "ad request returned no ad")
    }
}
