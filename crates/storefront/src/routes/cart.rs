//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart token lives in the session; cart contents live in Postgres so
//! the webhook can consume the cart when payment lands.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use verlaine_core::{CartToken, Locale, VariantId};

use crate::db::carts::{CartLineRecord, CartRepository, LoadedCart};
use crate::db::promotions::{PromotionRecord, PromotionRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequestLocale;
use crate::models::session::keys;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub variant_id: i32,
    pub product_slug: String,
    pub name: String,
    pub variant_label: String,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
    pub image_url: Option<String>,
    /// Stock ceiling for the quantity stepper.
    pub max_quantity: i32,
}

impl CartLineView {
    fn from_record(line: &CartLineRecord, locale: Locale) -> Self {
        let variant_label = match (line.size.as_deref(), line.color.as_deref()) {
            (Some(size), Some(color)) => format!("{size} · {color}"),
            (Some(one), None) | (None, Some(one)) => one.to_owned(),
            (None, None) => String::new(),
        };
        Self {
            variant_id: line.variant_id.as_i32(),
            product_slug: line.product_slug.clone(),
            name: line.name(locale).to_owned(),
            variant_label,
            quantity: line.quantity,
            unit_price: line.unit().display(),
            line_total: line.line_total().display(),
            image_url: line.image_url.clone(),
            max_quantity: line.inventory,
        }
    }
}

/// Cart display data for templates, with promotion applied.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: String,
    pub discount: Option<String>,
    pub total: String,
    pub promotion_code: Option<String>,
    pub promotion_description: Option<String>,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        let zero = verlaine_core::Price::zero(verlaine_core::CurrencyCode::EUR);
        Self {
            lines: Vec::new(),
            item_count: 0,
            subtotal: zero.display(),
            discount: None,
            total: zero.display(),
            promotion_code: None,
            promotion_description: None,
        }
    }

    fn build(cart: &LoadedCart, promotion: Option<&PromotionRecord>, locale: Locale) -> Self {
        let subtotal = cart.subtotal();
        let (total, discount, code, description) = match promotion {
            Some(promo) => {
                let total = subtotal.with_percent_off(promo.percent_off);
                let discount =
                    verlaine_core::Price::new(subtotal.amount - total.amount, total.currency_code);
                (
                    total,
                    Some(discount.display()),
                    Some(promo.code.clone()),
                    Some(promo.description(locale)),
                )
            }
            None => (subtotal, None, None, None),
        };

        Self {
            lines: cart
                .lines
                .iter()
                .map(|l| CartLineView::from_record(l, locale))
                .collect(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal().display(),
            discount,
            total: total.display(),
            promotion_code: code,
            promotion_description: description,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart token from the session.
pub async fn get_cart_token(session: &Session) -> Option<CartToken> {
    session
        .get::<CartToken>(keys::CART_TOKEN)
        .await
        .ok()
        .flatten()
}

/// Get the cart token, minting one if the session doesn't have one yet.
pub async fn ensure_cart_token(session: &Session) -> Result<CartToken> {
    if let Some(token) = get_cart_token(session).await {
        return Ok(token);
    }
    let token = CartToken::generate();
    session.insert(keys::CART_TOKEN, token).await?;
    Ok(token)
}

/// The promotion applied to this session's cart, if it is still valid.
///
/// An expired or deactivated code is silently dropped; the shopper sees
/// undiscounted totals rather than a stale promise.
pub async fn session_promotion(
    state: &AppState,
    session: &Session,
) -> Result<Option<PromotionRecord>> {
    let Some(code) = session.get::<String>(keys::PROMOTION_CODE).await.ok().flatten() else {
        return Ok(None);
    };

    let promo = PromotionRepository::new(state.pool())
        .find_by_code(&code)
        .await?;

    match promo {
        Some(promo) if promo.is_applicable_at(Utc::now()) => Ok(Some(promo)),
        _ => {
            session.remove::<String>(keys::PROMOTION_CODE).await?;
            Ok(None)
        }
    }
}

/// Load the session's cart as a view, promotion applied.
async fn load_cart_view(state: &AppState, session: &Session, locale: Locale) -> Result<CartView> {
    let Some(token) = get_cart_token(session).await else {
        return Ok(CartView::empty());
    };

    let Some(cart) = CartRepository::new(state.pool()).load(token).await? else {
        return Ok(CartView::empty());
    };

    let promotion = session_promotion(state, session).await?;
    Ok(CartView::build(&cart, promotion.as_ref(), locale))
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: i32,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub variant_id: i32,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub variant_id: i32,
}

/// Promotion code form data.
#[derive(Debug, Deserialize)]
pub struct PromotionForm {
    pub code: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub locale: Locale,
    pub cart: CartView,
    pub promotion_error: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub locale: Locale,
    pub cart: CartView,
    pub promotion_error: Option<String>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequestLocale(locale): RequestLocale,
) -> Result<CartShowTemplate> {
    let cart = load_cart_view(&state, &session, locale).await?;
    Ok(CartShowTemplate {
        locale,
        cart,
        promotion_error: None,
    })
}

/// Add a variant to the cart (HTMX).
///
/// Returns the cart count badge with an `HX-Trigger` so other fragments
/// can refresh themselves.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let token = ensure_cart_token(&session).await?;
    let quantity = form.quantity.unwrap_or(1).max(1);

    let repo = CartRepository::new(state.pool());
    repo.add_item(token, VariantId::new(form.variant_id), quantity)
        .await?;
    let count = repo.item_count(token).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response())
}

/// Update a cart line's quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequestLocale(locale): RequestLocale,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    if let Some(token) = get_cart_token(&session).await {
        CartRepository::new(state.pool())
            .set_quantity(token, VariantId::new(form.variant_id), form.quantity)
            .await?;
    }

    let cart = load_cart_view(&state, &session, locale).await?;
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            locale,
            cart,
            promotion_error: None,
        },
    )
        .into_response())
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequestLocale(locale): RequestLocale,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    if let Some(token) = get_cart_token(&session).await {
        CartRepository::new(state.pool())
            .remove_item(token, VariantId::new(form.variant_id))
            .await?;
    }

    let cart = load_cart_view(&state, &session, locale).await?;
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            locale,
            cart,
            promotion_error: None,
        },
    )
        .into_response())
}

/// Cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let count = match get_cart_token(&session).await {
        Some(token) => CartRepository::new(state.pool()).item_count(token).await?,
        None => 0,
    };

    Ok(CartCountTemplate { count })
}

/// Apply a promotion code to the session (HTMX).
#[instrument(skip(state, session))]
pub async fn apply_promotion(
    State(state): State<AppState>,
    session: Session,
    RequestLocale(locale): RequestLocale,
    Form(form): Form<PromotionForm>,
) -> Result<Response> {
    let code = form.code.trim();
    let promo = if code.is_empty() {
        None
    } else {
        PromotionRepository::new(state.pool()).find_by_code(code).await?
    };

    let promotion_error = match promo {
        Some(promo) if promo.is_applicable_at(Utc::now()) => {
            session.insert(keys::PROMOTION_CODE, &promo.code).await?;
            None
        }
        Some(_) => Some(match locale {
            Locale::Fr => "Ce code n'est plus valable.".to_owned(),
            Locale::En => "This code is no longer valid.".to_owned(),
        }),
        None => Some(match locale {
            Locale::Fr => "Code inconnu.".to_owned(),
            Locale::En => "Unknown code.".to_owned(),
        }),
    };

    let cart = load_cart_view(&state, &session, locale).await?;
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            locale,
            cart,
            promotion_error,
        },
    )
        .into_response())
}
