//! HTTP client for the payment provider's REST API.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use super::types::{CheckoutSession, CheckoutSessionRequest};
use super::PaymentError;

/// Client for creating hosted checkout sessions.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    http: reqwest::Client,
    api_base: String,
    secret_key: SecretString,
}

impl PaymentClient {
    /// Build a client against the provider's API base URL.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Http` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(api_base: String, secret_key: SecretString) -> Result<Self, PaymentError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_owned(),
            secret_key,
        })
    }

    /// Create a hosted checkout session and return it (the caller
    /// redirects the shopper to its `url`).
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Api` when the provider rejects the request,
    /// `PaymentError::Http` on transport failures, and
    /// `PaymentError::InvalidResponse` when the body cannot be parsed.
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| PaymentError::InvalidResponse(format!("{e}: {body}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed_from_base() {
        let client = PaymentClient::new(
            "https://pay.example.test/".to_owned(),
            SecretString::from("sk_test_abc"),
        )
        .expect("client builds");
        assert_eq!(client.api_base, "https://pay.example.test");
    }
}
