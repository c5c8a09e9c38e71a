//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use verlaine_core::{Locale, Price};

use crate::db::catalog::{ProductRecord, VariantRecord};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Product card display data for grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub slug: String,
    pub name: String,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub hover_image_url: Option<String>,
}

impl ProductCardView {
    /// Shape a product row for a card in the requested locale.
    #[must_use]
    pub fn from_record(record: &ProductRecord, locale: Locale) -> Self {
        Self {
            slug: record.slug.clone(),
            name: record.name(locale),
            price: record.from_price().as_ref().map(Price::display),
            image_url: record.image_url.clone(),
            hover_image_url: record.hover_image_url.clone(),
        }
    }
}

/// Variant display data for the size/colour picker.
#[derive(Clone)]
pub struct VariantView {
    pub id: i32,
    pub label: String,
    pub price: String,
    pub in_stock: bool,
}

impl VariantView {
    fn from_record(record: &VariantRecord, currency: verlaine_core::CurrencyCode) -> Self {
        Self {
            id: record.id.as_i32(),
            label: record.label(),
            price: Price::new(record.price, currency).display(),
            in_stock: record.in_stock(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub locale: Locale,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub variants: Vec<VariantView>,
    pub product_id: i32,
    pub any_in_stock: bool,
}

/// Display a product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    crate::middleware::RequestLocale(locale): crate::middleware::RequestLocale,
) -> Result<ProductShowTemplate> {
    let detail = state.product(&slug).await?;
    let currency = detail.product.currency_code();

    let variants: Vec<VariantView> = detail
        .variants
        .iter()
        .map(|v| VariantView::from_record(v, currency))
        .collect();
    let any_in_stock = variants.iter().any(|v| v.in_stock);

    Ok(ProductShowTemplate {
        locale,
        slug: detail.product.slug.clone(),
        name: detail.product.name(locale),
        description: detail.product.description(locale),
        image_url: detail.product.image_url.clone(),
        product_id: detail.product.id.as_i32(),
        variants,
        any_in_stock,
    })
}
