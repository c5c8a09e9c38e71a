//! Catalog repository: collections, products, and variants.
//!
//! All reads go through runtime-checked `query_as` so the workspace builds
//! without a live database; row structs derive `FromRow` and are shaped into
//! view models by the route layer.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use verlaine_core::{
    CollectionId, CurrencyCode, Locale, LocalizedText, Price, ProductId, VariantId,
};

use super::RepositoryError;

/// A catalog collection row.
#[derive(Debug, Clone, FromRow)]
pub struct CollectionRecord {
    pub id: CollectionId,
    pub slug: String,
    pub name_fr: String,
    pub name_en: String,
    pub description_fr: String,
    pub description_en: String,
    pub hero_image_url: Option<String>,
    pub position: i32,
}

impl CollectionRecord {
    /// Collection name resolved for a locale.
    #[must_use]
    pub fn name(&self, locale: Locale) -> String {
        LocalizedText::new(self.name_fr.clone(), self.name_en.clone())
            .resolve(locale)
            .to_owned()
    }

    /// Collection description resolved for a locale.
    #[must_use]
    pub fn description(&self, locale: Locale) -> String {
        LocalizedText::new(self.description_fr.clone(), self.description_en.clone())
            .resolve(locale)
            .to_owned()
    }
}

/// A product row, including its minimum variant price for card display.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRecord {
    pub id: ProductId,
    pub collection_id: Option<CollectionId>,
    pub slug: String,
    pub name_fr: String,
    pub name_en: String,
    pub description_fr: String,
    pub description_en: String,
    pub image_url: Option<String>,
    pub hover_image_url: Option<String>,
    pub currency: String,
    pub min_price: Option<Decimal>,
}

impl ProductRecord {
    /// Product name resolved for a locale.
    #[must_use]
    pub fn name(&self, locale: Locale) -> String {
        LocalizedText::new(self.name_fr.clone(), self.name_en.clone())
            .resolve(locale)
            .to_owned()
    }

    /// Product description resolved for a locale.
    #[must_use]
    pub fn description(&self, locale: Locale) -> String {
        LocalizedText::new(self.description_fr.clone(), self.description_en.clone())
            .resolve(locale)
            .to_owned()
    }

    /// Currency the product is priced in; EUR when the stored code is bad.
    #[must_use]
    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::parse(&self.currency).unwrap_or_default()
    }

    /// "From" price for product cards (cheapest variant).
    #[must_use]
    pub fn from_price(&self) -> Option<Price> {
        self.min_price
            .map(|amount| Price::new(amount, self.currency_code()))
    }
}

/// A purchasable variant row.
#[derive(Debug, Clone, FromRow)]
pub struct VariantRecord {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Decimal,
    pub inventory: i32,
}

impl VariantRecord {
    /// Whether the variant can still be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.inventory > 0
    }

    /// Human label, e.g. "38 · Noir".
    #[must_use]
    pub fn label(&self) -> String {
        match (self.size.as_deref(), self.color.as_deref()) {
            (Some(size), Some(color)) => format!("{size} · {color}"),
            (Some(one), None) | (None, Some(one)) => one.to_owned(),
            (None, None) => self.sku.clone(),
        }
    }
}

/// A collection with its published products, as one unit for page rendering.
#[derive(Debug, Clone)]
pub struct CollectionWithProducts {
    pub collection: CollectionRecord,
    pub products: Vec<ProductRecord>,
}

/// A product with its variants, as one unit for the detail page.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: ProductRecord,
    pub variants: Vec<VariantRecord>,
}

const PRODUCT_COLUMNS: &str = r"
    p.id, p.collection_id, p.slug, p.name_fr, p.name_en,
    p.description_fr, p.description_en, p.image_url, p.hover_image_url,
    p.currency,
    (SELECT MIN(v.price) FROM variants v WHERE v.product_id = p.id) AS min_price
";

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all published collections, in editor-defined order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_collections(&self) -> Result<Vec<CollectionRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, CollectionRecord>(
            r"
            SELECT id, slug, name_fr, name_en, description_fr, description_en,
                   hero_image_url, position
            FROM collections
            WHERE published
            ORDER BY position ASC, id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get a published collection and its published products by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such collection exists.
    pub async fn get_collection_by_slug(
        &self,
        slug: &str,
    ) -> Result<CollectionWithProducts, RepositoryError> {
        let collection = sqlx::query_as::<_, CollectionRecord>(
            r"
            SELECT id, slug, name_fr, name_en, description_fr, description_en,
                   hero_image_url, position
            FROM collections
            WHERE slug = $1 AND published
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let products = self.products_in_collection(collection.id).await?;

        Ok(CollectionWithProducts {
            collection,
            products,
        })
    }

    /// Published products of a collection, in editor-defined order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_in_collection(
        &self,
        collection_id: CollectionId,
    ) -> Result<Vec<ProductRecord>, RepositoryError> {
        let query = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            WHERE p.collection_id = $1 AND p.published
            ORDER BY p.position ASC, p.id ASC
            "
        );
        let rows = sqlx::query_as::<_, ProductRecord>(&query)
            .bind(collection_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// The newest published products, for the home page grid.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_products(&self, limit: i64) -> Result<Vec<ProductRecord>, RepositoryError> {
        let query = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            WHERE p.published
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $1
            "
        );
        let rows = sqlx::query_as::<_, ProductRecord>(&query)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// Get a published product and its variants by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<ProductDetail, RepositoryError> {
        let query = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            WHERE p.slug = $1 AND p.published
            "
        );
        let product = sqlx::query_as::<_, ProductRecord>(&query)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let variants = sqlx::query_as::<_, VariantRecord>(
            r"
            SELECT id, product_id, sku, size, color, price, inventory
            FROM variants
            WHERE product_id = $1
            ORDER BY position ASC, id ASC
            ",
        )
        .bind(product.id)
        .fetch_all(self.pool)
        .await?;

        Ok(ProductDetail { product, variants })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(size: Option<&str>, color: Option<&str>) -> VariantRecord {
        VariantRecord {
            id: VariantId::new(1),
            product_id: ProductId::new(1),
            sku: "MV-001".to_owned(),
            size: size.map(str::to_owned),
            color: color.map(str::to_owned),
            price: Decimal::new(19_000, 2),
            inventory: 3,
        }
    }

    #[test]
    fn test_variant_label_combines_size_and_color() {
        assert_eq!(variant(Some("38"), Some("Noir")).label(), "38 · Noir");
        assert_eq!(variant(Some("40"), None).label(), "40");
        assert_eq!(variant(None, Some("Ivoire")).label(), "Ivoire");
        assert_eq!(variant(None, None).label(), "MV-001");
    }

    #[test]
    fn test_variant_stock_flag() {
        let mut v = variant(None, None);
        assert!(v.in_stock());
        v.inventory = 0;
        assert!(!v.in_stock());
    }

    #[test]
    fn test_product_from_price_uses_currency() {
        let product = ProductRecord {
            id: ProductId::new(1),
            collection_id: None,
            slug: "manteau-verlaine".to_owned(),
            name_fr: "Manteau".to_owned(),
            name_en: "Coat".to_owned(),
            description_fr: String::new(),
            description_en: String::new(),
            image_url: None,
            hover_image_url: None,
            currency: "EUR".to_owned(),
            min_price: Some(Decimal::new(245_000, 2)),
        };

        let price = product.from_price().expect("has a price");
        assert_eq!(price.display(), "€2450.00");
        assert_eq!(product.name(Locale::En), "Coat");
    }
}
