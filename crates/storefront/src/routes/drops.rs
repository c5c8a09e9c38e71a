//! Drop calendar route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use chrono::Utc;
use tracing::instrument;

use verlaine_core::{DropPhase, Locale};

use crate::db::drops::DropRecord;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequestLocale;
use crate::state::AppState;

/// Drop display data for the calendar.
#[derive(Clone)]
pub struct DropView {
    pub title: String,
    pub teaser: String,
    pub collection_slug: String,
    pub collection_name: String,
    pub starts_at: String,
    pub ends_at: String,
    pub live: bool,
}

impl DropView {
    /// Shape a drop row for the calendar in the requested locale.
    #[must_use]
    pub fn from_record(record: &DropRecord, locale: Locale) -> Self {
        let phase = record.phase_at(Utc::now());
        Self {
            title: record.title(locale),
            teaser: record.teaser(locale),
            collection_slug: record.collection_slug.clone(),
            collection_name: record.collection_name(locale),
            starts_at: record.starts_at.format("%d.%m.%Y %H:%M UTC").to_string(),
            ends_at: record.ends_at.format("%d.%m.%Y %H:%M UTC").to_string(),
            live: phase == DropPhase::Live,
        }
    }
}

/// Drop calendar template.
#[derive(Template, WebTemplate)]
#[template(path = "drops/index.html")]
pub struct DropsIndexTemplate {
    pub locale: Locale,
    pub drops: Vec<DropView>,
}

/// Display the drop calendar (live and upcoming drops).
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Result<DropsIndexTemplate> {
    let drops = state
        .current_drops()
        .await?
        .iter()
        .map(|d| DropView::from_record(d, locale))
        .collect();

    Ok(DropsIndexTemplate { locale, drops })
}
