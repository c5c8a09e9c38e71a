//! Webhook signature verification against the signing helper.
//!
//! The signing side (`signature_header`) is what the payment provider
//! computes; the verifying side is what the storefront webhook runs.
//! These tests pin the two to the same wire format.

use verlaine_storefront::payments::{
    SignatureError, sign_payload, verify_signature,
};
use verlaine_storefront::payments::webhook::{SIGNATURE_HEADER, TOLERANCE_SECS, signature_header};

const SECRET: &[u8] = b"whsec_integration_test_secret";
const BODY: &[u8] = br#"{"id":"evt_1","type":"checkout.completed"}"#;

#[test]
fn test_signed_header_verifies() {
    let now = 1_750_000_000;
    let header = signature_header(SECRET, now, BODY);

    assert!(verify_signature(SECRET, &header, BODY, now).is_ok());
}

#[test]
fn test_header_name_is_lowercase() {
    // HeaderMap lookups are case-insensitive but the constant must be
    // lowercase for axum's HeaderName parsing.
    assert_eq!(SIGNATURE_HEADER, "verlaine-signature");
}

#[test]
fn test_verification_survives_clock_skew_within_tolerance() {
    let signed_at = 1_750_000_000;
    let header = signature_header(SECRET, signed_at, BODY);

    assert!(verify_signature(SECRET, &header, BODY, signed_at + TOLERANCE_SECS).is_ok());
    assert!(verify_signature(SECRET, &header, BODY, signed_at - TOLERANCE_SECS).is_ok());
}

#[test]
fn test_stale_header_rejected() {
    let signed_at = 1_750_000_000;
    let header = signature_header(SECRET, signed_at, BODY);

    let result = verify_signature(SECRET, &header, BODY, signed_at + TOLERANCE_SECS + 1);
    assert_eq!(result, Err(SignatureError::StaleTimestamp));
}

#[test]
fn test_tampered_body_rejected() {
    let now = 1_750_000_000;
    let header = signature_header(SECRET, now, BODY);

    let tampered = br#"{"id":"evt_2","type":"checkout.completed"}"#;
    let result = verify_signature(SECRET, &header, tampered, now);
    assert_eq!(result, Err(SignatureError::Mismatch));
}

#[test]
fn test_wrong_secret_rejected() {
    let now = 1_750_000_000;
    let header = signature_header(SECRET, now, BODY);

    let result = verify_signature(b"whsec_other", &header, BODY, now);
    assert_eq!(result, Err(SignatureError::Mismatch));
}

#[test]
fn test_signature_covers_timestamp() {
    // Replaying the v1 digest under a fresh timestamp must fail: the
    // timestamp is part of the signed payload, not just the header.
    let signed_at = 1_750_000_000;
    let digest = sign_payload(SECRET, signed_at, BODY);
    let replayed = format!("t={},v1={digest}", signed_at + 60);

    let result = verify_signature(SECRET, &replayed, BODY, signed_at + 60);
    assert_eq!(result, Err(SignatureError::Mismatch));
}

#[test]
fn test_garbage_header_rejected() {
    let now = 1_750_000_000;
    for header in ["", "t=,v1=", "v1=abc", "t=abc,v1=00", "t=123"] {
        assert_eq!(
            verify_signature(SECRET, header, BODY, now),
            Err(SignatureError::Malformed),
            "header {header:?} should be malformed"
        );
    }
}
