//! Checkout route handlers.
//!
//! Checkout hands the shopper to the payment provider's hosted page. The
//! cart token travels in the session metadata and comes back on the
//! webhook, which is where the order actually gets created.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use verlaine_core::Locale;

use crate::db::carts::CartRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequestLocale;
use crate::payments::{CheckoutSessionRequest, EventMetadata};
use crate::routes::{account, cart};
use crate::state::AppState;

/// Post-payment landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub locale: Locale,
}

/// Cancelled-payment landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/cancelled.html")]
pub struct CheckoutCancelledTemplate {
    pub locale: Locale,
}

/// Create a hosted checkout session and redirect the shopper to it.
///
/// An empty or missing cart bounces back to the cart page.
#[instrument(skip(state, session))]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    RequestLocale(locale): RequestLocale,
) -> Result<Response> {
    let Some(token) = cart::get_cart_token(&session).await else {
        return Ok(Redirect::to("/cart").into_response());
    };
    let Some(loaded) = CartRepository::new(state.pool()).load(token).await? else {
        return Ok(Redirect::to("/cart").into_response());
    };
    if loaded.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let subtotal = loaded.subtotal();
    let promotion = cart::session_promotion(&state, &session).await?;
    let total = promotion.as_ref().map_or(subtotal, |promo| {
        subtotal.with_percent_off(promo.percent_off)
    });

    let customer_email = account::current_user(&session)
        .await
        .map(|user| user.email.to_string());

    let base = state.config().base_url.trim_end_matches('/');
    let request = CheckoutSessionRequest {
        amount: total.amount,
        currency: total.currency_code.code().to_owned(),
        success_url: format!("{base}/checkout/success"),
        cancel_url: format!("{base}/checkout/cancelled"),
        customer_email,
        metadata: EventMetadata {
            cart_id: token.to_string(),
            locale: Some(locale.as_str().to_owned()),
            promotion_code: promotion.map(|p| p.code),
        },
    };

    let checkout = state.payments().create_checkout_session(&request).await?;
    tracing::info!(session_id = %checkout.id, "Created hosted checkout session");

    Ok(Redirect::to(&checkout.url).into_response())
}

/// Post-payment landing page.
///
/// The order itself is created by the webhook, which may land after the
/// shopper does; this page only thanks them.
#[instrument]
pub async fn success(RequestLocale(locale): RequestLocale) -> CheckoutSuccessTemplate {
    CheckoutSuccessTemplate { locale }
}

/// Cancelled-payment landing page.
#[instrument]
pub async fn cancelled(RequestLocale(locale): RequestLocale) -> CheckoutCancelledTemplate {
    CheckoutCancelledTemplate { locale }
}
