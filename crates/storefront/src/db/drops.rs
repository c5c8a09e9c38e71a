//! Drop repository: time-boxed releases tied to a collection.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use verlaine_core::{CollectionId, DropId, DropPhase, Locale, LocalizedText};

use super::RepositoryError;

/// A drop row joined with its collection's slug and name.
#[derive(Debug, Clone, FromRow)]
pub struct DropRecord {
    pub id: DropId,
    pub collection_id: CollectionId,
    pub slug: String,
    pub title_fr: String,
    pub title_en: String,
    pub teaser_fr: String,
    pub teaser_en: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub collection_slug: String,
    pub collection_name_fr: String,
    pub collection_name_en: String,
}

impl DropRecord {
    /// Drop title resolved for a locale.
    #[must_use]
    pub fn title(&self, locale: Locale) -> String {
        LocalizedText::new(self.title_fr.clone(), self.title_en.clone())
            .resolve(locale)
            .to_owned()
    }

    /// Teaser copy resolved for a locale.
    #[must_use]
    pub fn teaser(&self, locale: Locale) -> String {
        LocalizedText::new(self.teaser_fr.clone(), self.teaser_en.clone())
            .resolve(locale)
            .to_owned()
    }

    /// Collection name resolved for a locale.
    #[must_use]
    pub fn collection_name(&self, locale: Locale) -> String {
        LocalizedText::new(
            self.collection_name_fr.clone(),
            self.collection_name_en.clone(),
        )
        .resolve(locale)
        .to_owned()
    }

    /// Phase of this drop at the given instant.
    #[must_use]
    pub fn phase_at(&self, now: DateTime<Utc>) -> DropPhase {
        DropPhase::at(now, self.starts_at, self.ends_at)
    }
}

const DROP_COLUMNS: &str = r"
    d.id, d.collection_id, d.slug, d.title_fr, d.title_en,
    d.teaser_fr, d.teaser_en, d.starts_at, d.ends_at,
    c.slug AS collection_slug, c.name_fr AS collection_name_fr,
    c.name_en AS collection_name_en
";

/// Repository for drop reads.
pub struct DropRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DropRepository<'a> {
    /// Create a new drop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Drops that are live or upcoming, soonest-starting first.
    ///
    /// Ended drops stay out of the storefront entirely, and so do drops
    /// whose collection is unpublished (the banner would link to a page
    /// that doesn't resolve).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_current(&self) -> Result<Vec<DropRecord>, RepositoryError> {
        let query = format!(
            r"
            SELECT {DROP_COLUMNS}
            FROM drops d
            JOIN collections c ON c.id = d.collection_id
            WHERE d.ends_at > NOW() AND c.published
            ORDER BY d.starts_at ASC
            "
        );
        let rows = sqlx::query_as::<_, DropRecord>(&query)
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }
}
