//! Journal route handlers.
//!
//! Posts live in the database (edited through the admin console); bodies
//! are markdown rendered at request time.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use verlaine_core::Locale;

use crate::content::render_markdown;
use crate::db::journal::{JournalPostRecord, JournalRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequestLocale;
use crate::state::AppState;

/// Journal post card for the index page.
#[derive(Clone)]
pub struct PostCardView {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_image_url: Option<String>,
    pub published_on: String,
}

impl PostCardView {
    fn from_record(record: &JournalPostRecord, locale: Locale) -> Self {
        Self {
            slug: record.slug.clone(),
            title: record.title(locale),
            excerpt: record.excerpt(locale),
            cover_image_url: record.cover_image_url.clone(),
            published_on: record
                .published_at
                .map(|at| at.format("%d.%m.%Y").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Journal index template.
#[derive(Template, WebTemplate)]
#[template(path = "journal/index.html")]
pub struct JournalIndexTemplate {
    pub locale: Locale,
    pub posts: Vec<PostCardView>,
}

/// Journal post template.
#[derive(Template, WebTemplate)]
#[template(path = "journal/show.html")]
pub struct JournalShowTemplate {
    pub locale: Locale,
    pub title: String,
    pub published_on: String,
    pub cover_image_url: Option<String>,
    pub body_html: String,
}

/// Display the journal index.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Result<JournalIndexTemplate> {
    let posts = state
        .journal_index()
        .await?
        .iter()
        .map(|p| PostCardView::from_record(p, locale))
        .collect();

    Ok(JournalIndexTemplate { locale, posts })
}

/// Display a single journal post.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RequestLocale(locale): RequestLocale,
) -> Result<JournalShowTemplate> {
    let post = JournalRepository::new(state.pool())
        .get_published_by_slug(&slug)
        .await?;

    Ok(JournalShowTemplate {
        locale,
        title: post.title(locale),
        published_on: post
            .published_at
            .map(|at| at.format("%d.%m.%Y").to_string())
            .unwrap_or_default(),
        cover_image_url: post.cover_image_url.clone(),
        body_html: render_markdown(post.body_markdown(locale)),
    })
}
