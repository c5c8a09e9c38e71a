//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use verlaine_core::{CartToken, Locale, ProductId};

use crate::db::wishlists::{WishlistItemRecord, WishlistRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequestLocale;
use crate::models::session::keys;
use crate::state::AppState;

/// Wishlist entry display data.
#[derive(Clone)]
pub struct WishlistItemView {
    pub product_id: i32,
    pub product_slug: String,
    pub name: String,
    pub image_url: Option<String>,
}

impl WishlistItemView {
    fn from_record(record: &WishlistItemRecord, locale: Locale) -> Self {
        Self {
            product_id: record.product_id.as_i32(),
            product_slug: record.product_slug.clone(),
            name: record.name(locale).to_owned(),
            image_url: record.image_url.clone(),
        }
    }
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistShowTemplate {
    pub locale: Locale,
    pub items: Vec<WishlistItemView>,
}

/// Wishlist form data.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: i32,
}

/// Get the wishlist token from the session.
pub async fn get_wishlist_token(session: &Session) -> Option<CartToken> {
    session
        .get::<CartToken>(keys::WISHLIST_TOKEN)
        .await
        .ok()
        .flatten()
}

/// Get the wishlist token, minting one if the session doesn't have one yet.
pub async fn ensure_wishlist_token(session: &Session) -> Result<CartToken> {
    if let Some(token) = get_wishlist_token(session).await {
        return Ok(token);
    }
    let token = CartToken::generate();
    session.insert(keys::WISHLIST_TOKEN, token).await?;
    Ok(token)
}

/// Display the wishlist page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequestLocale(locale): RequestLocale,
) -> Result<WishlistShowTemplate> {
    let items = match get_wishlist_token(&session).await {
        Some(token) => WishlistRepository::new(state.pool())
            .list(token)
            .await?
            .iter()
            .map(|i| WishlistItemView::from_record(i, locale))
            .collect(),
        None => Vec::new(),
    };

    Ok(WishlistShowTemplate { locale, items })
}

/// Save a product to the wishlist (HTMX).
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<WishlistForm>,
) -> Result<Response> {
    let token = ensure_wishlist_token(&session).await?;
    WishlistRepository::new(state.pool())
        .add(token, ProductId::new(form.product_id))
        .await?;

    Ok((AppendHeaders([("HX-Trigger", "wishlist-updated")]), ()).into_response())
}

/// Remove a product from the wishlist (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequestLocale(locale): RequestLocale,
    Form(form): Form<WishlistForm>,
) -> Result<Response> {
    if let Some(token) = get_wishlist_token(&session).await {
        WishlistRepository::new(state.pool())
            .remove(token, ProductId::new(form.product_id))
            .await?;
    }

    // Re-render the whole page body so the removed card disappears.
    let template = show(State(state), session, RequestLocale(locale)).await?;
    Ok((
        AppendHeaders([("HX-Trigger", "wishlist-updated")]),
        template,
    )
        .into_response())
}
