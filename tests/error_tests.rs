//! Tests for error types.
//!
//! Validates error display formatting for each error category.

use magiklink::Error;
use std::path::PathBuf;

// =============================================================================
// Validation Error Tests
// =============================================================================

#[test]
fn test_provider_not_running_display() {
    let err = Error::ProviderNotRunning {
        id: "4a2f6c1e9b0d".to_string(),
    };
    let msg = format!("{}", err);

    assert!(msg.contains("4a2f6c1e9b0d"), "should include provider ID");
    assert!(msg.contains("not running"), "should indicate not running");
}

#[test]
fn test_missing_fields_display() {
    assert!(Error::MissingBridgeAddress.to_string().contains("bridge"));
    assert!(Error::MissingAlias.to_string().contains("alias"));
}

#[test]
fn test_invalid_port_spec_display() {
    let err = Error::InvalidPortSpec {
        spec: "70000/tcp".to_string(),
        reason: "port number must be in 1..=65535".to_string(),
    };
    let msg = format!("{}", err);

    assert!(msg.contains("70000/tcp"), "should include spec");
    assert!(msg.contains("65535"), "should include reason");
}

// =============================================================================
// Repository Error Tests
// =============================================================================

#[test]
fn test_duplicate_link_display() {
    let err = Error::DuplicateLink("4a2f6c1e9b0d:DB".to_string());
    let msg = format!("{}", err);

    assert!(msg.contains("4a2f6c1e9b0d:DB"), "should include link ID");
    assert!(msg.contains("already exists"), "should indicate duplicate");
}

#[test]
fn test_not_found_display() {
    let err = Error::NotFound("4a2f6c1e9b0d:DB".to_string());

    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_identity_mismatch_display() {
    let err = Error::ProviderIdentityMismatch {
        expected: "aaaaaaaaaaaa".to_string(),
        actual: "bbbbbbbbbbbb".to_string(),
    };
    let msg = format!("{}", err);

    assert!(msg.contains("aaaaaaaaaaaa"), "should include expected ID");
    assert!(msg.contains("bbbbbbbbbbbb"), "should include actual ID");
}

#[test]
fn test_limit_exceeded_display() {
    let err = Error::LimitExceeded { limit: 4096 };

    assert!(err.to_string().contains("4096"));
}

// =============================================================================
// Storage Error Tests
// =============================================================================

#[test]
fn test_store_unavailable_display() {
    let err = Error::StoreUnavailable {
        path: PathBuf::from("/var/lib/magiklink/links.json"),
        reason: "permission denied".to_string(),
    };
    let msg = format!("{}", err);

    assert!(msg.contains("/var/lib/magiklink/links.json"), "should include path");
    assert!(msg.contains("permission denied"), "should include reason");
}

#[test]
fn test_invalid_link_display() {
    let err = Error::InvalidLink("alias 'db' is not normalized".to_string());
    let msg = format!("{}", err);

    assert!(msg.contains("invalid link record"), "should indicate bad record");
    assert!(msg.contains("'db'"), "should include reason");
}

#[test]
fn test_errors_are_send_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<Error>();
}
