//! Container and link identifiers.
//!
//! - `generate_id`: random 64-hex-character container identifiers
//! - `truncate_id`: fixed-length prefix used in link IDs and env values
//! - `normalize_alias`: uppercase form used for env keys and link IDs
//! - `link_id`: composite `<short consumer id>:<ALIAS>` key

use crate::constants::{GENERATED_ID_BYTES, LINK_ID_SEPARATOR, SHORT_ID_LEN};
use sha2::{Digest, Sha256};

/// Generates a random container identifier.
///
/// Returns `GENERATED_ID_BYTES` bytes of entropy as lowercase hex. Two
/// UUIDv4 values are hashed together with SHA-256 so every output bit is
/// uniformly distributed (UUIDv4 fixes six version/variant bits).
///
/// Identifiers whose truncated form is a plain decimal number are
/// discarded and regenerated, so a short ID can never be mistaken for a
/// numeric argument.
#[must_use]
pub fn generate_id() -> String {
    loop {
        let mut hasher = Sha256::new();
        hasher.update(uuid::Uuid::new_v4().as_bytes());
        hasher.update(uuid::Uuid::new_v4().as_bytes());
        let digest = hasher.finalize();
        let id = hex::encode(&digest[..GENERATED_ID_BYTES]);

        if !is_numeric(truncate_id(&id)) {
            return id;
        }
    }
}

/// Returns the first `SHORT_ID_LEN` characters of an identifier.
///
/// Identifiers shorter than `SHORT_ID_LEN` are returned unchanged.
#[must_use]
pub fn truncate_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Uppercases an alias. No other characters are changed or stripped.
#[must_use]
pub fn normalize_alias(alias: &str) -> String {
    alias.to_uppercase()
}

/// Builds the composite link ID for a consumer and alias.
///
/// Accepts full or already-truncated consumer IDs, and raw or normalized
/// aliases; the result is the same either way.
#[must_use]
pub fn link_id(consumer_id: &str, alias: &str) -> String {
    format!(
        "{}{}{}",
        truncate_id(consumer_id),
        LINK_ID_SEPARATOR,
        normalize_alias(alias)
    )
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
