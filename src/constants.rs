//! # Link Repository Constants
//!
//! Identifier widths, store layout, and table bounds for the link layer.
//! These constants are the **single source of truth** for values that end
//! up in persisted link IDs and generated environment keys.
//!
//! ## Modification Guidelines
//!
//! Several of these values are part of an on-disk or in-process contract:
//! 1. `SHORT_ID_LEN` is embedded in every persisted link ID. Changing it
//!    orphans existing links.
//! 2. `LINK_STORE_FILE` and `LINK_STORE_VERSION` define the store layout.
//! 3. `FILTERED_ENV_KEYS` changes the environment consumers observe.
//!
//! ## Cross-References
//!
//! - [`crate::id`]: Uses identifier widths
//! - [`crate::env`]: Uses filtered environment keys
//! - [`crate::store`]: Uses store layout constants
//! - [`crate::repository`]: Uses table bounds

// =============================================================================
// Identifiers
// =============================================================================

/// Length of a truncated container identifier.
///
/// Truncated IDs prefix link IDs (`<short id>:<ALIAS>`) and are exported to
/// consumers as `<ALIAS>_ID`. This is a prefix, not a hash: two containers
/// sharing the first 12 hex characters collide, which surfaces as a
/// duplicate-link error.
pub const SHORT_ID_LEN: usize = 12;

/// Number of random bytes in a generated container identifier.
///
/// Hex-encoded, this yields 64-character identifiers. Bytes are taken from
/// a SHA-256 digest, so this cannot exceed 32.
pub const GENERATED_ID_BYTES: usize = 32;

const _: () = assert!(GENERATED_ID_BYTES <= 32);

/// Separator between the truncated consumer ID and the alias in a link ID.
pub const LINK_ID_SEPARATOR: char = ':';

// =============================================================================
// Environment
// =============================================================================

/// Provider environment keys that are never re-exported to consumers.
///
/// These are injected by image builds rather than declared by the provider,
/// and exporting them as `<ALIAS>_ENV_PATH` only adds noise.
pub const FILTERED_ENV_KEYS: &[&str] = &["HOME", "PATH"];

// =============================================================================
// Storage
// =============================================================================
//
// The backing store is a single JSON document inside the configured
// directory. The default base directory is `~/.magiklink`.
// =============================================================================

/// Subdirectory (below the base directory) holding the link store.
pub const LINK_STORE_DIR: &str = "links";

/// File name of the persisted link table.
pub const LINK_STORE_FILE: &str = "links.json";

/// Schema version written into the persisted link table.
///
/// Stores with a different version are rejected on open.
pub const LINK_STORE_VERSION: u32 = 1;

// =============================================================================
// Limits
// =============================================================================

/// Maximum number of links held by one repository.
///
/// **Security**: Bounds memory and store size when a caller creates links
/// in a loop. Four links per container at the runtime's container cap.
pub const MAX_LINKS: usize = 4096;
