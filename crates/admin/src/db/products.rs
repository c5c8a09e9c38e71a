//! Product and variant CRUD for editors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use verlaine_core::{CollectionId, ProductId, VariantId};

use super::{RepositoryError, map_insert_error};

/// A product row as editors see it, including unpublished ones.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductRow {
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
    pub position: i32,
    pub published: bool,
}

/// Editor-supplied fields for creating or replacing a product.
#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub collection_id: Option<CollectionId>,
    pub slug: String,
    pub name_fr: String,
    pub name_en: String,
    #[serde(default)]
    pub description_fr: String,
    #[serde(default)]
    pub description_en: String,
    pub image_url: Option<String>,
    pub hover_image_url: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub published: bool,
}

fn default_currency() -> String {
    "EUR".to_owned()
}

/// A variant row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VariantRow {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Decimal,
    pub inventory: i32,
}

/// Editor-supplied fields for creating or replacing a variant.
#[derive(Debug, Deserialize)]
pub struct VariantInput {
    pub sku: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub inventory: i32,
}

const PRODUCT_COLUMNS: &str = "id, collection_id, slug, name_fr, name_en, description_fr, \
                               description_en, image_url, hover_image_url, currency, \
                               position, published";

const VARIANT_COLUMNS: &str = "id, product_id, sku, size, color, price, inventory";

/// Repository for product and variant writes.
pub struct ProductAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductAdminRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product, published or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn list(&self) -> Result<Vec<ProductRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY position ASC, id ASC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Fetch one product by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist.
    pub async fn get(&self, id: ProductId) -> Result<ProductRow, RepositoryError> {
        sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the slug is taken.
    pub async fn create(&self, input: &ProductInput) -> Result<ProductRow, RepositoryError> {
        sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (collection_id, slug, name_fr, name_en, description_fr,
                                   description_en, image_url, hover_image_url, currency,
                                   position, published)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(input.collection_id)
        .bind(&input.slug)
        .bind(&input.name_fr)
        .bind(&input.name_en)
        .bind(&input.description_fr)
        .bind(&input.description_en)
        .bind(&input.image_url)
        .bind(&input.hover_image_url)
        .bind(&input.currency)
        .bind(input.position)
        .bind(input.published)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "product slug"))
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist, `Conflict` if the new
    /// slug is taken.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<ProductRow, RepositoryError> {
        sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products
             SET collection_id = $2, slug = $3, name_fr = $4, name_en = $5,
                 description_fr = $6, description_en = $7, image_url = $8,
                 hover_image_url = $9, currency = $10, position = $11,
                 published = $12, updated_at = NOW()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(input.collection_id)
        .bind(&input.slug)
        .bind(&input.name_fr)
        .bind(&input.name_en)
        .bind(&input.description_fr)
        .bind(&input.description_en)
        .bind(&input.image_url)
        .bind(&input.hover_image_url)
        .bind(&input.currency)
        .bind(input.position)
        .bind(input.published)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "product slug"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product and its variants.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// List a product's variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn list_variants(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<VariantRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM variants WHERE product_id = $1 ORDER BY id ASC"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Add a variant to a product.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the SKU is taken.
    pub async fn create_variant(
        &self,
        product_id: ProductId,
        input: &VariantInput,
    ) -> Result<VariantRow, RepositoryError> {
        sqlx::query_as::<_, VariantRow>(&format!(
            "INSERT INTO variants (product_id, sku, size, color, price, inventory)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {VARIANT_COLUMNS}"
        ))
        .bind(product_id)
        .bind(&input.sku)
        .bind(&input.size)
        .bind(&input.color)
        .bind(input.price)
        .bind(input.inventory)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "variant SKU"))
    }

    /// Replace a variant's fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist, `Conflict` if the new
    /// SKU is taken.
    pub async fn update_variant(
        &self,
        id: VariantId,
        input: &VariantInput,
    ) -> Result<VariantRow, RepositoryError> {
        sqlx::query_as::<_, VariantRow>(&format!(
            "UPDATE variants
             SET sku = $2, size = $3, color = $4, price = $5, inventory = $6,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {VARIANT_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.sku)
        .bind(&input.size)
        .bind(&input.color)
        .bind(input.price)
        .bind(input.inventory)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "variant SKU"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a variant.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the row does not exist.
    pub async fn delete_variant(&self, id: VariantId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM variants WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
