//! Error types for the mirroring engine.

use thiserror::Error;

/// Result type for mirroring operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Errors that can occur while mirroring.
///
/// Only `Config` is allowed to escape the engine (startup-time failure is
/// acceptable to be loud). Lookup and dispatch failures are contained per
/// transaction: logged, treated as "not found" or "missed mirror", never
/// propagated back to the host.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Configuration file missing, unreadable, or unparsable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Repository listing, existence check, or object fetch failed.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// The publish or unpublish dispatch failed.
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MirrorError {
    /// Whether this error may escape the engine to the host.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, MirrorError::Config(_))
    }
}
