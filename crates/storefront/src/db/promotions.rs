//! Promotion repository: percent-off codes with validity windows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use verlaine_core::{Locale, LocalizedText, PromotionId};

use super::RepositoryError;

/// A promotion row.
#[derive(Debug, Clone, FromRow)]
pub struct PromotionRecord {
    pub id: PromotionId,
    pub code: String,
    pub description_fr: String,
    pub description_en: String,
    pub percent_off: Decimal,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub active: bool,
}

impl PromotionRecord {
    /// Whether the promotion can be applied at the given instant.
    #[must_use]
    pub fn is_applicable_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.starts_at <= now && now < self.ends_at
    }

    /// Description resolved for a locale.
    #[must_use]
    pub fn description(&self, locale: Locale) -> String {
        LocalizedText::new(self.description_fr.clone(), self.description_en.clone())
            .resolve(locale)
            .to_owned()
    }
}

/// Repository for promotion reads.
pub struct PromotionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromotionRepository<'a> {
    /// Create a new promotion repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a promotion by its code (case-insensitive).
    ///
    /// Returns the row regardless of whether it is currently applicable;
    /// callers decide how to message expired or inactive codes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<PromotionRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, PromotionRecord>(
            r"
            SELECT id, code, description_fr, description_en, percent_off,
                   starts_at, ends_at, active
            FROM promotions
            WHERE UPPER(code) = UPPER($1)
            ",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promo(active: bool, start_offset_h: i64, end_offset_h: i64) -> PromotionRecord {
        let now = Utc::now();
        PromotionRecord {
            id: PromotionId::new(1),
            code: "ARCHIVES15".to_owned(),
            description_fr: "Ventes d'archives".to_owned(),
            description_en: "Archive sale".to_owned(),
            percent_off: Decimal::new(15, 0),
            starts_at: now + Duration::hours(start_offset_h),
            ends_at: now + Duration::hours(end_offset_h),
            active,
        }
    }

    #[test]
    fn test_applicable_inside_window() {
        assert!(promo(true, -1, 1).is_applicable_at(Utc::now()));
    }

    #[test]
    fn test_not_applicable_when_inactive_or_outside_window() {
        let now = Utc::now();
        assert!(!promo(false, -1, 1).is_applicable_at(now));
        assert!(!promo(true, 1, 2).is_applicable_at(now));
        assert!(!promo(true, -2, -1).is_applicable_at(now));
    }
}
