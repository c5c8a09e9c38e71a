//! Collection route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use verlaine_core::Locale;

use crate::db::catalog::CollectionRecord;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequestLocale;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Collection card display data.
#[derive(Clone)]
pub struct CollectionCardView {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub hero_image_url: Option<String>,
}

impl CollectionCardView {
    /// Shape a collection row for a card in the requested locale.
    #[must_use]
    pub fn from_record(record: &CollectionRecord, locale: Locale) -> Self {
        Self {
            slug: record.slug.clone(),
            name: record.name(locale),
            description: record.description(locale),
            hero_image_url: record.hero_image_url.clone(),
        }
    }
}

/// Collection listing template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/index.html")]
pub struct CollectionsIndexTemplate {
    pub locale: Locale,
    pub collections: Vec<CollectionCardView>,
}

/// Collection detail template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionShowTemplate {
    pub locale: Locale,
    pub name: String,
    pub description: String,
    pub hero_image_url: Option<String>,
    pub products: Vec<ProductCardView>,
}

/// Display the collection listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Result<CollectionsIndexTemplate> {
    let collections = state
        .collections()
        .await?
        .iter()
        .map(|c| CollectionCardView::from_record(c, locale))
        .collect();

    Ok(CollectionsIndexTemplate {
        locale,
        collections,
    })
}

/// Display a collection and its products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RequestLocale(locale): RequestLocale,
) -> Result<CollectionShowTemplate> {
    let page = state.collection(&slug).await?;

    Ok(CollectionShowTemplate {
        locale,
        name: page.collection.name(locale),
        description: page.collection.description(locale),
        hero_image_url: page.collection.hero_image_url.clone(),
        products: page
            .products
            .iter()
            .map(|p| ProductCardView::from_record(p, locale))
            .collect(),
    })
}
