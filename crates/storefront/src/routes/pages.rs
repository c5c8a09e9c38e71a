//! Markdown editorial page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use verlaine_core::Locale;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequestLocale;
use crate::state::AppState;

/// Editorial page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/show.html")]
pub struct PageTemplate {
    pub locale: Locale,
    pub title: String,
    pub content_html: String,
}

/// Display a markdown page (maison, care guide, legal, etc.).
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RequestLocale(locale): RequestLocale,
) -> Result<PageTemplate> {
    let page = state
        .content()
        .get_page(locale, &slug)
        .ok_or_else(|| AppError::NotFound(slug.clone()))?;

    Ok(PageTemplate {
        locale,
        title: page.meta.title.clone(),
        content_html: page.content_html.clone(),
    })
}
