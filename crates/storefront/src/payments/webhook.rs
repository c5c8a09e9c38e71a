//! Webhook signature verification.
//!
//! The provider signs each delivery with
//! `Verlaine-Signature: t=<unix>,v1=<hex>` where `v1` is an HMAC-SHA256
//! over `"{t}.{raw_body}"`. Verification is constant-time (via the `hmac`
//! crate's tag comparison) and rejects timestamps outside a five-minute
//! window to blunt replays.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature.
pub const SIGNATURE_HEADER: &str = "verlaine-signature";

/// Maximum accepted clock skew between the event timestamp and now.
pub const TOLERANCE_SECS: i64 = 300;

/// Signature verification failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The header doesn't match `t=<unix>,v1=<hex>`.
    #[error("malformed signature header")]
    Malformed,

    /// The timestamp is too far from the current time.
    #[error("signature timestamp outside tolerance")]
    StaleTimestamp,

    /// The HMAC doesn't match the payload.
    #[error("signature mismatch")]
    Mismatch,
}

/// Compute the hex signature for a payload at a timestamp.
///
/// Exposed so tests (and the provider simulator in the seed tooling) can
/// produce valid deliveries.
#[must_use]
pub fn sign_payload(secret: &[u8], timestamp: i64, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Build a complete signature header value for a payload.
#[must_use]
pub fn signature_header(secret: &[u8], timestamp: i64, body: &[u8]) -> String {
    format!("t={timestamp},v1={}", sign_payload(secret, timestamp, body))
}

/// Verify a signature header against the raw request body.
///
/// # Errors
///
/// Returns a [`SignatureError`] describing the first check that failed;
/// the webhook route maps all of them to an unauthorized response without
/// distinguishing (no oracle for attackers).
pub fn verify_signature(
    secret: &[u8],
    header: &str,
    body: &[u8],
    now: i64,
) -> Result<(), SignatureError> {
    let (timestamp, signature) = parse_header(header)?;

    if (now - timestamp).abs() > TOLERANCE_SECS {
        return Err(SignatureError::StaleTimestamp);
    }

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    mac.verify_slice(&signature)
        .map_err(|_| SignatureError::Mismatch)
}

/// Parse `t=<unix>,v1=<hex>` into its parts.
fn parse_header(header: &str) -> Result<(i64, Vec<u8>), SignatureError> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse::<i64>().map_err(|_| SignatureError::Malformed)?);
            }
            Some(("v1", value)) => {
                signature = Some(hex::decode(value).map_err(|_| SignatureError::Malformed)?);
            }
            // Unknown parts are ignored so the provider can add schemes.
            Some(_) => {}
            None => return Err(SignatureError::Malformed),
        }
    }

    match (timestamp, signature) {
        (Some(t), Some(v)) => Ok((t, v)),
        _ => Err(SignatureError::Malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"whsec_9f86d081884c7d659a2feaa0c55ad015";
    const BODY: &[u8] = br#"{"id":"evt_1","type":"checkout.completed"}"#;

    #[test]
    fn test_valid_signature_verifies() {
        let now = 1_767_225_600;
        let header = signature_header(SECRET, now, BODY);
        assert_eq!(verify_signature(SECRET, &header, BODY, now), Ok(()));
    }

    #[test]
    fn test_skew_within_tolerance_verifies() {
        let now = 1_767_225_600;
        let header = signature_header(SECRET, now - TOLERANCE_SECS, BODY);
        assert_eq!(verify_signature(SECRET, &header, BODY, now), Ok(()));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let now = 1_767_225_600;
        let header = signature_header(SECRET, now - TOLERANCE_SECS - 1, BODY);
        assert_eq!(
            verify_signature(SECRET, &header, BODY, now),
            Err(SignatureError::StaleTimestamp)
        );
    }

    #[test]
    fn test_tampered_body_rejected() {
        let now = 1_767_225_600;
        let header = signature_header(SECRET, now, BODY);
        assert_eq!(
            verify_signature(SECRET, &header, b"{\"tampered\":true}", now),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let now = 1_767_225_600;
        let header = signature_header(b"whsec_other", now, BODY);
        assert_eq!(
            verify_signature(SECRET, &header, BODY, now),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_malformed_headers_rejected() {
        let now = 1_767_225_600;
        for header in ["", "t=abc,v1=00", "v1=00", "t=123", "t=123,v1=zz", "nonsense"] {
            assert_eq!(
                verify_signature(SECRET, header, BODY, now),
                Err(SignatureError::Malformed),
                "header {header:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_unknown_scheme_parts_ignored() {
        let now = 1_767_225_600;
        let sig = sign_payload(SECRET, now, BODY);
        let header = format!("t={now},v0=deadbeef,v1={sig}");
        assert_eq!(verify_signature(SECRET, &header, BODY, now), Ok(()));
    }
}
