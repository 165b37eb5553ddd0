//! Error types for the link layer.

use std::path::PathBuf;

/// Result type alias for link operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the link layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// Provider container is not running.
    #[error("provider container '{id}' is not running")]
    ProviderNotRunning { id: String },

    /// Bridge interface address is empty.
    #[error("missing bridge interface address")]
    MissingBridgeAddress,

    /// Link alias is empty.
    #[error("missing link alias")]
    MissingAlias,

    /// Port declaration could not be parsed.
    #[error("invalid port spec '{spec}': {reason}")]
    InvalidPortSpec { spec: String, reason: String },

    // =========================================================================
    // Repository Errors
    // =========================================================================
    /// A link with this ID already exists.
    #[error("link already exists: {0}")]
    DuplicateLink(String),

    /// Link not found.
    #[error("link not found: {0}")]
    NotFound(String),

    /// Refresh target is a different container than the link's provider.
    #[error("provider identity mismatch: link targets '{expected}', got '{actual}'")]
    ProviderIdentityMismatch { expected: String, actual: String },

    /// Repository is at capacity.
    #[error("link limit exceeded: {limit} links")]
    LimitExceeded { limit: usize },

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// Backing store could not be opened, read, or written.
    #[error("link store unavailable at {path}: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },

    /// Stored link record violates a link invariant.
    #[error("invalid link record: {0}")]
    InvalidLink(String),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
