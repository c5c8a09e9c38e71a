//! Wishlist repository.
//!
//! Wishlists mirror carts: a cookie-scoped token, an optional owning user,
//! and a merge on sign-in. Unlike cart lines they hold products (not
//! variants) and have no quantities, so merging is a plain set union.

use sqlx::{FromRow, PgPool};

use verlaine_core::{CartToken, Locale, ProductId, UserId};

use super::RepositoryError;

/// A wishlist entry joined with product data for display.
#[derive(Debug, Clone, FromRow)]
pub struct WishlistItemRecord {
    pub product_id: ProductId,
    pub product_slug: String,
    pub name_fr: String,
    pub name_en: String,
    pub image_url: Option<String>,
}

impl WishlistItemRecord {
    /// Product name in the shopper's locale.
    #[must_use]
    pub fn name(&self, locale: Locale) -> &str {
        let (wanted, fallback) = match locale {
            Locale::Fr => (&self.name_fr, &self.name_en),
            Locale::En => (&self.name_en, &self.name_fr),
        };
        if wanted.is_empty() { fallback } else { wanted }
    }
}

/// A bare wishlist row.
#[derive(Debug, Clone, FromRow)]
struct WishlistRow {
    token: CartToken,
}

/// Repository for wishlist operations.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a product to the wishlist, creating the wishlist as needed.
    /// Adding an already-saved product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add(&self, token: CartToken, product_id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO wishlists (token)
            VALUES ($1)
            ON CONFLICT (token) DO NOTHING
            ",
        )
        .bind(token)
        .execute(self.pool)
        .await?;

        sqlx::query(
            r"
            INSERT INTO wishlist_items (wishlist_token, product_id)
            VALUES ($1, $2)
            ON CONFLICT (wishlist_token, product_id) DO NOTHING
            ",
        )
        .bind(token)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a product from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        token: CartToken,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM wishlist_items
            WHERE wishlist_token = $1 AND product_id = $2
            ",
        )
        .bind(token)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List the wishlist's products, most recently saved first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, token: CartToken) -> Result<Vec<WishlistItemRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, WishlistItemRecord>(
            r"
            SELECT wi.product_id, p.slug AS product_slug, p.name_fr, p.name_en, p.image_url
            FROM wishlist_items wi
            JOIN products p ON p.id = wi.product_id
            WHERE wi.wishlist_token = $1
            ORDER BY wi.created_at DESC
            ",
        )
        .bind(token)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Merge an anonymous wishlist into the user's wishlist (set union),
    /// then delete the anonymous one. Same transaction discipline as
    /// [`super::CartRepository::merge_into_user`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any step fails.
    pub async fn merge_into_user(
        &self,
        anonymous: CartToken,
        user_id: UserId,
    ) -> Result<CartToken, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user_list: Option<WishlistRow> = sqlx::query_as(
            r"
            SELECT token
            FROM wishlists
            WHERE user_id = $1
            FOR UPDATE
            ",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_list) = user_list else {
            sqlx::query(
                r"
                INSERT INTO wishlists (token, user_id)
                VALUES ($1, $2)
                ON CONFLICT (token) DO UPDATE SET user_id = EXCLUDED.user_id
                ",
            )
            .bind(anonymous)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            return Ok(anonymous);
        };

        if user_list.token == anonymous {
            tx.commit().await?;
            return Ok(anonymous);
        }

        sqlx::query(
            r"
            INSERT INTO wishlist_items (wishlist_token, product_id)
            SELECT $2, product_id
            FROM wishlist_items
            WHERE wishlist_token = $1
            ON CONFLICT (wishlist_token, product_id) DO NOTHING
            ",
        )
        .bind(anonymous)
        .bind(user_list.token)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM wishlist_items WHERE wishlist_token = $1")
            .bind(anonymous)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM wishlists WHERE token = $1")
            .bind(anonymous)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user_list.token)
    }
}
