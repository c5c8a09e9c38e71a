//! Home page and language switcher route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::header,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tracing::instrument;

use verlaine_core::{DropPhase, Locale};

use crate::error::Result;
use crate::filters;
use crate::middleware::{RequestLocale, lang_cookie_value};
use crate::routes::collections::CollectionCardView;
use crate::routes::drops::DropView;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub locale: Locale,
    /// The drop currently live, for the banner.
    pub live_drop: Option<DropView>,
    /// Collections for the front-page grid.
    pub collections: Vec<CollectionCardView>,
    /// Newest products.
    pub latest: Vec<ProductCardView>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Result<HomeTemplate> {
    let now = Utc::now();
    let live_drop = state
        .current_drops()
        .await?
        .iter()
        .find(|d| d.phase_at(now) == DropPhase::Live)
        .map(|d| DropView::from_record(d, locale));

    let collections = state
        .collections()
        .await?
        .iter()
        .map(|c| CollectionCardView::from_record(c, locale))
        .collect();

    let latest = state
        .latest_products()
        .await?
        .iter()
        .map(|p| ProductCardView::from_record(p, locale))
        .collect();

    Ok(HomeTemplate {
        locale,
        live_drop,
        collections,
        latest,
    })
}

/// Switch the display language and bounce back to the referring page.
///
/// Unknown tags redirect without setting the cookie.
#[instrument(skip(headers))]
pub async fn switch_language(
    Path(tag): Path<String>,
    headers: axum::http::HeaderMap,
) -> Response {
    let back = headers
        .get(header::REFERER)
        .and_then(|h| h.to_str().ok())
        // Only bounce to same-site relative targets.
        .filter(|r| r.starts_with('/') && !r.starts_with("//"))
        .unwrap_or("/")
        .to_owned();

    match Locale::parse(&tag) {
        Some(locale) => (
            AppendHeaders([(header::SET_COOKIE, lang_cookie_value(locale))]),
            Redirect::to(&back),
        )
            .into_response(),
        None => Redirect::to(&back).into_response(),
    }
}
