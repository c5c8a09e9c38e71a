//! Payment provider integration.
//!
//! Two halves:
//! - [`client`] - outbound: create hosted checkout sessions over HTTPS
//! - [`webhook`] - inbound: verify signed events the provider posts back
//!
//! The provider is Stripe-shaped: hosted checkout, metadata echoed back on
//! events, HMAC-signed webhook payloads, aggressive retries on non-2xx.

pub mod client;
pub mod types;
pub mod webhook;

pub use client::PaymentClient;
pub use types::{CheckoutSession, CheckoutSessionRequest, EventMetadata, WebhookEvent};
pub use webhook::{SignatureError, sign_payload, verify_signature};

use thiserror::Error;

/// Errors from the payment provider integration.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Transport-level failure talking to the provider.
    #[error("payment provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request.
    #[error("payment provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The provider's response could not be parsed.
    #[error("invalid payment provider response: {0}")]
    InvalidResponse(String),
}
