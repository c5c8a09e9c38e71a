//! Wire types for the payment provider API and its webhook events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::orders::ShippingDetails;

/// Event type fired when a hosted checkout completes successfully.
pub const CHECKOUT_COMPLETED: &str = "checkout.completed";

/// Request to create a hosted checkout session.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSessionRequest {
    /// Amount to charge, in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Where the provider sends the shopper after payment.
    pub success_url: String,
    /// Where the provider sends the shopper if they back out.
    pub cancel_url: String,
    /// Pre-filled customer email, when the shopper is signed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Echoed back verbatim on webhook events.
    pub metadata: EventMetadata,
}

/// A created hosted checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Provider-assigned session ID.
    pub id: String,
    /// Hosted payment page to redirect the shopper to.
    pub url: String,
}

/// Metadata we attach at checkout and read back from webhook events.
///
/// This is the only link between a provider event and our cart, so it
/// carries everything order creation needs that isn't on the event itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Token of the cart being paid for.
    pub cart_id: String,
    /// Locale the shopper was browsing in (denormalized onto order lines).
    #[serde(default)]
    pub locale: Option<String>,
    /// Promotion code applied at checkout, if any.
    #[serde(default)]
    pub promotion_code: Option<String>,
}

/// A webhook event as posted by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Provider-assigned event ID.
    pub id: String,
    /// Event type, e.g. `checkout.completed`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Unix timestamp of event creation.
    pub created: i64,
    /// Event payload.
    pub data: EventData,
}

/// Payload of a checkout event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    /// Provider transaction ID - our idempotency key.
    pub transaction_id: String,
    /// Amount actually charged.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Customer email collected on the hosted page, if any.
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Shipping address collected on the hosted page, if any.
    #[serde(default)]
    pub shipping_address: Option<ShippingDetails>,
    /// Metadata echoed back from the checkout session.
    pub metadata: EventMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserializes() {
        let json = r#"{
            "id": "evt_8f14e45f",
            "type": "checkout.completed",
            "created": 1767225600,
            "data": {
                "transaction_id": "txn_a1b2c3",
                "amount": "325.50",
                "currency": "EUR",
                "customer_email": "client@example.fr",
                "shipping_address": {
                    "name": "Camille Laurent",
                    "line1": "12 rue de Sevres",
                    "city": "Paris",
                    "postal_code": "75007",
                    "country": "FR"
                },
                "metadata": {
                    "cart_id": "0192a9c8-4f0e-7aa9-b1fa-2c65a7c2b9d4",
                    "locale": "fr"
                }
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).expect("valid event");
        assert_eq!(event.event_type, CHECKOUT_COMPLETED);
        assert_eq!(event.data.amount.to_string(), "325.50");
        assert_eq!(event.data.metadata.promotion_code, None);
        assert!(event.data.shipping_address.is_some());
    }

    #[test]
    fn test_event_without_optional_fields() {
        let json = r#"{
            "id": "evt_1",
            "type": "checkout.expired",
            "created": 1767225600,
            "data": {
                "transaction_id": "txn_1",
                "amount": "10.00",
                "currency": "EUR",
                "metadata": { "cart_id": "not-even-a-uuid" }
            }
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).expect("valid event");
        assert_eq!(event.data.customer_email, None);
        assert!(event.data.shipping_address.is_none());
    }
}
