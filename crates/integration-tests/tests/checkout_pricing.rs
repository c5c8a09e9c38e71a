//! Promotion arithmetic and payment event parsing.
//!
//! The storefront shows a discounted total computed from core money
//! types, and the webhook trusts the provider's charged amount. These
//! tests pin both halves to the same numbers.

use rust_decimal::Decimal;
use verlaine_core::{CartToken, CurrencyCode, Locale, Price};
use verlaine_storefront::payments::WebhookEvent;
use verlaine_storefront::payments::types::CHECKOUT_COMPLETED;

#[test]
fn test_ten_percent_off_round_total() {
    let subtotal = Price::new(Decimal::from(890), CurrencyCode::EUR);
    let total = subtotal.with_percent_off(Decimal::from(10));

    assert_eq!(total.amount, Decimal::from(801));
    assert_eq!(total.currency_code, CurrencyCode::EUR);
}

#[test]
fn test_discount_rounds_to_cents() {
    let subtotal = Price::new(Decimal::new(24_999, 2), CurrencyCode::EUR); // 249.99
    let total = subtotal.with_percent_off(Decimal::from(15));

    // 249.99 * 0.85 = 212.4915, kept at cent precision
    assert_eq!(total.amount, Decimal::new(21_249, 2));
}

#[test]
fn test_checkout_event_roundtrip() {
    // The metadata the checkout route sends must come back intact in the
    // webhook event for order creation to find the cart.
    let cart_token = CartToken::generate();
    let payload = serde_json::json!({
        "id": "evt_9",
        "type": CHECKOUT_COMPLETED,
        "created": 1_750_000_000_i64,
        "data": {
            "transaction_id": "txn_42",
            "amount": "801.00",
            "currency": "EUR",
            "customer_email": "camille@example.fr",
            "shipping_address": {
                "name": "Camille Moreau",
                "line1": "12 rue de Poitou",
                "city": "Paris",
                "postal_code": "75003",
                "country": "FR"
            },
            "metadata": {
                "cart_id": cart_token.to_string(),
                "locale": "fr",
                "promotion_code": "BIENVENUE10"
            }
        }
    });

    let event: WebhookEvent =
        serde_json::from_value(payload).expect("event should deserialize");

    assert_eq!(event.event_type, CHECKOUT_COMPLETED);
    assert_eq!(event.data.amount, Decimal::new(80_100, 2));
    assert_eq!(
        CartToken::parse(&event.data.metadata.cart_id).expect("valid token"),
        cart_token
    );
    assert_eq!(
        event.data.metadata.locale.as_deref().and_then(Locale::parse),
        Some(Locale::Fr)
    );
}

#[test]
fn test_unknown_event_type_still_parses() {
    // The webhook acknowledges unknown types; parsing must not reject them.
    let payload = serde_json::json!({
        "id": "evt_10",
        "type": "checkout.expired",
        "created": 1_750_000_000_i64,
        "data": {
            "transaction_id": "txn_43",
            "amount": "0.00",
            "currency": "EUR",
            "customer_email": null,
            "metadata": { "cart_id": "not-checked-here" }
        }
    });

    let event: WebhookEvent =
        serde_json::from_value(payload).expect("event should deserialize");
    assert_ne!(event.event_type, CHECKOUT_COMPLETED);
}
