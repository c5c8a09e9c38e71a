//! Cart repository.
//!
//! Carts are identified by a random [`CartToken`] carried in the session
//! cookie. A signed-in shopper has at most one cart (enforced by a partial
//! unique index on `user_id`); the anonymous cart from before sign-in is
//! merged into it and deleted.
//!
//! Quantities are clamped to the variant's inventory at every write so a
//! cart can never promise more stock than exists at that moment.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use verlaine_core::{CartToken, CurrencyCode, Locale, Price, ProductId, UserId, VariantId};

use super::RepositoryError;

/// A cart line joined with variant and product data for display and pricing.
#[derive(Debug, Clone, FromRow)]
pub struct CartLineRecord {
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub product_slug: String,
    pub name_fr: String,
    pub name_en: String,
    pub sku: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub image_url: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub currency: String,
    pub inventory: i32,
}

impl CartLineRecord {
    /// Product name in the shopper's locale.
    #[must_use]
    pub fn name(&self, locale: Locale) -> &str {
        let (wanted, fallback) = match locale {
            Locale::Fr => (&self.name_fr, &self.name_en),
            Locale::En => (&self.name_en, &self.name_fr),
        };
        if wanted.is_empty() { fallback } else { wanted }
    }

    /// Currency the line is priced in.
    #[must_use]
    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::parse(&self.currency).unwrap_or_default()
    }

    /// Unit price as a [`Price`].
    #[must_use]
    pub fn unit(&self) -> Price {
        Price::new(self.unit_price, self.currency_code())
    }

    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit().times(u32::try_from(self.quantity).unwrap_or(0))
    }
}

/// A cart with its lines, loaded as one unit.
#[derive(Debug, Clone)]
pub struct LoadedCart {
    pub token: CartToken,
    pub user_id: Option<UserId>,
    pub lines: Vec<CartLineRecord>,
}

impl LoadedCart {
    /// Sum of line totals before any promotion.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let currency = self
            .lines
            .first()
            .map_or_else(CurrencyCode::default, CartLineRecord::currency_code);
        self.lines
            .iter()
            .map(CartLineRecord::line_total)
            .fold(Price::zero(currency), |acc, line| acc + line)
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .map(|l| u32::try_from(l.quantity).unwrap_or(0))
            .sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A bare cart row.
#[derive(Debug, Clone, FromRow)]
struct CartRow {
    token: CartToken,
    user_id: Option<UserId>,
}

const LINE_COLUMNS: &str = r"
    ci.variant_id, p.id AS product_id, p.slug AS product_slug,
    p.name_fr, p.name_en, v.sku, v.size, v.color, p.image_url,
    ci.quantity, v.price AS unit_price, p.currency, v.inventory
";

/// Repository for cart operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Ensure a cart row exists for the token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn ensure(&self, token: CartToken) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO carts (token)
            VALUES ($1)
            ON CONFLICT (token) DO NOTHING
            ",
        )
        .bind(token)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Add a quantity of a variant to the cart, creating the cart and the
    /// line as needed. The resulting quantity is clamped to the variant's
    /// inventory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant doesn't exist.
    pub async fn add_item(
        &self,
        token: CartToken,
        variant_id: VariantId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        self.ensure(token).await?;

        let result = sqlx::query(
            r"
            INSERT INTO cart_items (cart_token, variant_id, quantity)
            SELECT $1, v.id, LEAST($3, v.inventory)
            FROM variants v
            WHERE v.id = $2 AND v.inventory > 0
            ON CONFLICT (cart_token, variant_id) DO UPDATE
            SET quantity = LEAST(
                cart_items.quantity + EXCLUDED.quantity,
                (SELECT inventory FROM variants WHERE id = EXCLUDED.variant_id)
            ),
                updated_at = NOW()
            ",
        )
        .bind(token)
        .bind(variant_id)
        .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Set the quantity of a line; zero removes it. Clamped to inventory.
    ///
    /// A variant that sold out after the line was added has nothing left
    /// to clamp to (`cart_items.quantity` must stay positive), so the line
    /// is removed instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn set_quantity(
        &self,
        token: CartToken,
        variant_id: VariantId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        if quantity == 0 {
            return self.remove_item(token, variant_id).await;
        }

        let result = sqlx::query(
            r"
            UPDATE cart_items ci
            SET quantity = LEAST($3, v.inventory), updated_at = NOW()
            FROM variants v
            WHERE ci.cart_token = $1 AND ci.variant_id = $2
              AND v.id = ci.variant_id AND v.inventory > 0
            ",
        )
        .bind(token)
        .bind(variant_id)
        .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            self.remove_item(token, variant_id).await?;
        }

        Ok(())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        token: CartToken,
        variant_id: VariantId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE cart_token = $1 AND variant_id = $2
            ",
        )
        .bind(token)
        .bind(variant_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Load a cart and its lines. Returns `None` if the cart row doesn't
    /// exist (an empty cart row loads as `Some` with no lines).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn load(&self, token: CartToken) -> Result<Option<LoadedCart>, RepositoryError> {
        let cart = sqlx::query_as::<_, CartRow>(
            r"
            SELECT token, user_id
            FROM carts
            WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        let Some(cart) = cart else {
            return Ok(None);
        };

        let query = format!(
            r"
            SELECT {LINE_COLUMNS}
            FROM cart_items ci
            JOIN variants v ON v.id = ci.variant_id
            JOIN products p ON p.id = v.product_id
            WHERE ci.cart_token = $1
            ORDER BY ci.created_at ASC
            "
        );
        let lines = sqlx::query_as::<_, CartLineRecord>(&query)
            .bind(token)
            .fetch_all(self.pool)
            .await?;

        Ok(Some(LoadedCart {
            token: cart.token,
            user_id: cart.user_id,
            lines,
        }))
    }

    /// Total item count for the cart badge.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_count(&self, token: CartToken) -> Result<u32, RepositoryError> {
        let count: Option<i64> = sqlx::query_scalar(
            r"
            SELECT SUM(quantity)::BIGINT
            FROM cart_items
            WHERE cart_token = $1
            ",
        )
        .bind(token)
        .fetch_one(self.pool)
        .await?;

        Ok(u32::try_from(count.unwrap_or(0)).unwrap_or(0))
    }

    /// Merge an anonymous cart into the user's cart.
    ///
    /// Runs in one transaction:
    /// 1. Find (or claim) the user's cart. If the user has none, the
    ///    anonymous cart simply becomes theirs and we're done.
    /// 2. Otherwise move every anonymous line over, summing quantities for
    ///    lines on the same variant (clamped to inventory). Lines whose
    ///    variant has sold out are dropped rather than carried over.
    /// 3. Delete the anonymous cart and its lines.
    ///
    /// Returns the token of the cart the session should use from now on.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any step fails; the
    /// transaction rolls back and both carts are left untouched.
    pub async fn merge_into_user(
        &self,
        anonymous: CartToken,
        user_id: UserId,
    ) -> Result<CartToken, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user_cart: Option<CartRow> = sqlx::query_as(
            r"
            SELECT token, user_id
            FROM carts
            WHERE user_id = $1
            FOR UPDATE
            ",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_cart) = user_cart else {
            // No existing cart: claim the anonymous one for this user.
            sqlx::query(
                r"
                INSERT INTO carts (token, user_id)
                VALUES ($1, $2)
                ON CONFLICT (token) DO UPDATE SET user_id = EXCLUDED.user_id, updated_at = NOW()
                ",
            )
            .bind(anonymous)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            return Ok(anonymous);
        };

        if user_cart.token == anonymous {
            tx.commit().await?;
            return Ok(anonymous);
        }

        // The source filter keeps sold-out variants out entirely, so the
        // clamp in the conflict branch can never reach zero and trip the
        // positive-quantity check on cart_items.
        sqlx::query(
            r"
            INSERT INTO cart_items (cart_token, variant_id, quantity)
            SELECT $2, ci.variant_id, LEAST(ci.quantity, v.inventory)
            FROM cart_items ci
            JOIN variants v ON v.id = ci.variant_id
            WHERE ci.cart_token = $1 AND v.inventory > 0
            ON CONFLICT (cart_token, variant_id) DO UPDATE
            SET quantity = LEAST(
                cart_items.quantity + EXCLUDED.quantity,
                (SELECT inventory FROM variants WHERE id = EXCLUDED.variant_id)
            ),
                updated_at = NOW()
            ",
        )
        .bind(anonymous)
        .bind(user_cart.token)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM cart_items WHERE cart_token = $1")
            .bind(anonymous)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM carts WHERE token = $1")
            .bind(anonymous)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user_cart.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(qty: i32, price: &str) -> CartLineRecord {
        CartLineRecord {
            variant_id: VariantId::new(1),
            product_id: ProductId::new(1),
            product_slug: "veste-delacroix".to_owned(),
            name_fr: "Veste Delacroix".to_owned(),
            name_en: "Delacroix Jacket".to_owned(),
            sku: "MV-VD-38".to_owned(),
            size: Some("38".to_owned()),
            color: None,
            image_url: None,
            quantity: qty,
            unit_price: price.parse().expect("valid decimal"),
            currency: "EUR".to_owned(),
            inventory: 5,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(3, "120.00").line_total().display(), "€360.00");
    }

    #[test]
    fn test_subtotal_and_count() {
        let cart = LoadedCart {
            token: CartToken::generate(),
            user_id: None,
            lines: vec![line(2, "120.00"), line(1, "85.50")],
        };
        assert_eq!(cart.subtotal().display(), "€325.50");
        assert_eq!(cart.item_count(), 3);
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_empty_cart_subtotal_is_zero() {
        let cart = LoadedCart {
            token: CartToken::generate(),
            user_id: None,
            lines: Vec::new(),
        };
        assert_eq!(cart.subtotal().amount, Decimal::ZERO);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_line_name_falls_back() {
        let mut l = line(1, "10.00");
        l.name_en = String::new();
        assert_eq!(l.name(Locale::En), "Veste Delacroix");
    }
}
