//! Payment provider webhook handler.
//!
//! The provider POSTs signed events here. `checkout.completed` creates the
//! order (order row, denormalized lines, payment record, cart deletion, all
//! in one transaction); every other event type is acknowledged and ignored.
//! The provider retries on any non-2xx, so the handler acks events it can
//! authenticate but cannot act on rather than inviting an infinite retry
//! loop.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;
use secrecy::ExposeSecret;
use tracing::instrument;

use verlaine_core::{CartToken, CurrencyCode, Email, Locale, Price};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::orders::{NewOrder, OrderRepository};
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::payments::types::CHECKOUT_COMPLETED;
use crate::payments::webhook::SIGNATURE_HEADER;
use crate::payments::{WebhookEvent, verify_signature};
use crate::state::AppState;

/// Handle a payment provider webhook delivery.
#[instrument(skip_all)]
pub async fn payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing signature".to_owned()))?;

    verify_signature(
        state.config().payments.webhook_secret.expose_secret().as_bytes(),
        signature,
        &body,
        Utc::now().timestamp(),
    )
    .map_err(|e| {
        tracing::warn!(error = %e, "Rejected webhook delivery");
        AppError::Unauthorized("invalid signature".to_owned())
    })?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("malformed event: {e}")))?;

    if event.event_type != CHECKOUT_COMPLETED {
        tracing::debug!(event_type = %event.event_type, "Ignoring webhook event");
        return Ok(StatusCode::OK);
    }

    process_completed_checkout(&state, &event).await?;
    Ok(StatusCode::OK)
}

/// Turn a completed checkout event into an order.
async fn process_completed_checkout(state: &AppState, event: &WebhookEvent) -> Result<()> {
    let data = &event.data;
    let orders = OrderRepository::new(state.pool());

    // Idempotency: the provider redelivers until it sees a 2xx.
    if orders.payment_exists(&data.transaction_id).await? {
        tracing::info!(
            transaction_id = %data.transaction_id,
            "Payment already recorded, acking redelivery"
        );
        return Ok(());
    }

    let Ok(token) = CartToken::parse(&data.metadata.cart_id) else {
        tracing::error!(cart_id = %data.metadata.cart_id, "Webhook metadata has no usable cart");
        sentry::capture_message(
            "Webhook event with unparseable cart token",
            sentry::Level::Error,
        );
        return Ok(());
    };

    let Some(cart) = CartRepository::new(state.pool()).load(token).await? else {
        // The cart is gone but no payment row exists: retrying can't fix
        // this, so record it loudly and ack.
        tracing::error!(
            transaction_id = %data.transaction_id,
            "Paid cart not found and payment not recorded"
        );
        sentry::capture_message("Paid cart missing at webhook time", sentry::Level::Error);
        return Ok(());
    };

    let locale = data
        .metadata
        .locale
        .as_deref()
        .and_then(Locale::parse)
        .unwrap_or_default();

    let email = match &data.customer_email {
        Some(raw) => match Email::parse(raw) {
            Ok(email) => Some(email),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed customer email on event");
                None
            }
        },
        None => None,
    };

    // Tie the order to a user row when we have an address; checkout as a
    // ghost is still allowed.
    let user_id = match &email {
        Some(email) => Some(
            UserRepository::new(state.pool())
                .get_or_create(email)
                .await?
                .id,
        ),
        None => cart.user_id,
    };

    let currency = CurrencyCode::parse(&data.currency).unwrap_or_default();
    let new_order = NewOrder {
        provider_transaction_id: data.transaction_id.clone(),
        email: email.clone(),
        user_id,
        locale,
        subtotal: cart.subtotal(),
        // The provider's charge is authoritative for what was paid.
        total: Price::new(data.amount, currency),
        promotion_code: data.metadata.promotion_code.clone(),
        shipping: data.shipping_address.clone(),
    };

    let order = match orders.create_from_cart(&cart, new_order).await {
        Ok(order) => order,
        Err(RepositoryError::Conflict(_)) => {
            // A concurrent delivery won the race; its order stands.
            tracing::info!(
                transaction_id = %data.transaction_id,
                "Payment recorded concurrently, acking"
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        reference = %order.reference,
        transaction_id = %data.transaction_id,
        "Order created from webhook"
    );

    // Confirmation email is best-effort and outside the transaction: the
    // order exists whether or not the mail goes out.
    if let Some(to) = &order.email {
        let address = to.to_string();
        if let Err(e) = state.email().send_order_confirmation(&address, &order).await {
            tracing::error!(error = %e, reference = %order.reference, "Confirmation email failed");
            sentry::capture_error(&e);
        }
    }

    Ok(())
}
