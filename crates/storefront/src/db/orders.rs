//! Order repository.
//!
//! Orders exist only because the payment webhook created them: an order row,
//! one line per cart line (denormalizing name, price, and locale at time of
//! purchase), and a payment record, all inside one transaction that also
//! deletes the originating cart. The payment's provider transaction ID is
//! the idempotency key.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use verlaine_core::{Email, Locale, OrderId, OrderStatus, Price, UserId};

use super::RepositoryError;
use super::carts::LoadedCart;

/// Shipping details as carried on the payment event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub name: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Everything needed to create an order from a paid cart.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub provider_transaction_id: String,
    pub email: Option<Email>,
    pub user_id: Option<UserId>,
    pub locale: Locale,
    pub subtotal: Price,
    pub total: Price,
    pub promotion_code: Option<String>,
    pub shipping: Option<ShippingDetails>,
}

/// A created order, as returned from the transaction for the
/// confirmation email.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub id: OrderId,
    pub reference: String,
    pub email: Option<Email>,
    pub locale: Locale,
    pub total: Price,
    pub lines: Vec<OrderLineSummary>,
    pub shipping: Option<ShippingDetails>,
}

/// A denormalized order line.
#[derive(Debug, Clone)]
pub struct OrderLineSummary {
    pub product_name: String,
    pub sku: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// Generate a human-quotable order reference like `MV-3F9A2C41`.
fn generate_reference() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    let short = id.get(..8).unwrap_or("00000000").to_uppercase();
    format!("MV-{short}")
}

/// Repository for order creation.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether a payment record already exists for the provider's
    /// transaction ID (the webhook idempotency check).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn payment_exists(
        &self,
        provider_transaction_id: &str,
    ) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM payments WHERE provider_transaction_id = $1
            )
            ",
        )
        .bind(provider_transaction_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Create an order from a paid cart in a single transaction.
    ///
    /// Inserts the order row, one order-line row per cart line (product
    /// name denormalized in the buyer's locale), and the payment record;
    /// then deletes the cart and its lines. If any step fails the
    /// transaction rolls back and the cart survives for a retried webhook.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the provider transaction ID
    /// was inserted concurrently (the unique index makes double-processing
    /// impossible even across racing webhook deliveries), or
    /// `RepositoryError::Database` for other failures.
    pub async fn create_from_cart(
        &self,
        cart: &LoadedCart,
        new: NewOrder,
    ) -> Result<OrderSummary, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let reference = generate_reference();
        let discount = new.subtotal.amount - new.total.amount;

        let order_id: OrderId = sqlx::query_scalar(
            r"
            INSERT INTO orders (
                reference, user_id, email, locale, status, currency,
                subtotal, discount, total, promotion_code,
                shipping_name, shipping_line1, shipping_line2,
                shipping_city, shipping_postal_code, shipping_country
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16)
            RETURNING id
            ",
        )
        .bind(&reference)
        .bind(new.user_id)
        .bind(new.email.as_ref())
        .bind(new.locale.as_str())
        .bind(OrderStatus::Paid.as_str())
        .bind(new.total.currency_code.code())
        .bind(new.subtotal.amount)
        .bind(discount)
        .bind(new.total.amount)
        .bind(new.promotion_code.as_deref())
        .bind(new.shipping.as_ref().map(|s| s.name.as_str()))
        .bind(new.shipping.as_ref().map(|s| s.line1.as_str()))
        .bind(new.shipping.as_ref().and_then(|s| s.line2.as_deref()))
        .bind(new.shipping.as_ref().map(|s| s.city.as_str()))
        .bind(new.shipping.as_ref().map(|s| s.postal_code.as_str()))
        .bind(new.shipping.as_ref().map(|s| s.country.as_str()))
        .fetch_one(&mut *tx)
        .await?;

        let mut lines = Vec::with_capacity(cart.lines.len());
        for cart_line in &cart.lines {
            let product_name = cart_line.name(new.locale).to_owned();
            let quantity = u32::try_from(cart_line.quantity).unwrap_or(0);
            let line_total = cart_line.line_total();

            sqlx::query(
                r"
                INSERT INTO order_lines (
                    order_id, variant_id, product_name, sku,
                    unit_price, quantity, line_total
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(order_id)
            .bind(cart_line.variant_id)
            .bind(&product_name)
            .bind(&cart_line.sku)
            .bind(cart_line.unit_price)
            .bind(cart_line.quantity)
            .bind(line_total.amount)
            .execute(&mut *tx)
            .await?;

            lines.push(OrderLineSummary {
                product_name,
                sku: cart_line.sku.clone(),
                quantity,
                unit_price: cart_line.unit(),
                line_total,
            });
        }

        sqlx::query(
            r"
            INSERT INTO payments (order_id, provider_transaction_id, amount, currency)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(order_id)
        .bind(&new.provider_transaction_id)
        .bind(new.total.amount)
        .bind(new.total.currency_code.code())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("payment already recorded".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        sqlx::query("DELETE FROM cart_items WHERE cart_token = $1")
            .bind(cart.token)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM carts WHERE token = $1")
            .bind(cart.token)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(OrderSummary {
            id: order_id,
            reference,
            email: new.email,
            locale: new.locale,
            total: new.total,
            lines,
            shipping: new.shipping,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_shape() {
        let reference = generate_reference();
        assert!(reference.starts_with("MV-"));
        assert_eq!(reference.len(), 11);
        assert!(
            reference
                .trim_start_matches("MV-")
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_references_are_unique_enough() {
        let a = generate_reference();
        let b = generate_reference();
        assert_ne!(a, b);
    }

    #[test]
    fn test_shipping_details_deserialize_without_line2() {
        let json = r#"{
            "name": "Camille Laurent",
            "line1": "12 rue de Sevres",
            "city": "Paris",
            "postal_code": "75007",
            "country": "FR"
        }"#;
        let shipping: ShippingDetails = serde_json::from_str(json).expect("valid shipping");
        assert_eq!(shipping.line2, None);
        assert_eq!(shipping.city, "Paris");
    }
}
