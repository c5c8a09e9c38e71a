//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::{CacheKey, CacheValue, CatalogCache, build_catalog_cache};
use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::db::RepositoryError;
use crate::db::catalog::{
    CatalogRepository, CollectionRecord, CollectionWithProducts, ProductDetail, ProductRecord,
};
use crate::db::drops::{DropRecord, DropRepository};
use crate::db::journal::{JournalPostRecord, JournalRepository};
use crate::payments::{PaymentClient, PaymentError};
use crate::services::EmailService;

/// How many products the home page features.
const HOME_PRODUCT_LIMIT: i64 = 8;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("payment client error: {0}")]
    Payment(#[from] PaymentError),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("content error: {0}")]
    Content(#[from] ContentError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    payments: PaymentClient,
    email: EmailService,
    content: ContentStore,
    cache: CatalogCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment client, SMTP transport, or content
    /// store cannot be built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, StateError> {
        let payments = PaymentClient::new(
            config.payments.api_base.clone(),
            config.payments.secret_key.clone(),
        )?;
        let email = EmailService::new(&config.smtp)?;
        let content = ContentStore::load(&config.content_dir)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                payments,
                email,
                content,
                cache: build_catalog_cache(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the payment provider client.
    #[must_use]
    pub fn payments(&self) -> &PaymentClient {
        &self.inner.payments
    }

    /// Get a reference to the email service.
    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }

    /// Get a reference to the markdown content store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    // Cached catalog reads. Misses hit Postgres and populate the cache;
    // a NotFound is never cached so a slug fixed in admin shows up on the
    // next request.

    /// All visible collections, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn collections(&self) -> Result<Vec<CollectionRecord>, RepositoryError> {
        if let Some(CacheValue::Collections(rows)) =
            self.inner.cache.get(&CacheKey::Collections).await
        {
            return Ok(rows);
        }

        let rows = CatalogRepository::new(self.pool()).list_collections().await?;
        self.inner
            .cache
            .insert(CacheKey::Collections, CacheValue::Collections(rows.clone()))
            .await;
        Ok(rows)
    }

    /// A collection and its products, by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no visible collection has
    /// the slug.
    pub async fn collection(&self, slug: &str) -> Result<CollectionWithProducts, RepositoryError> {
        let key = CacheKey::Collection(slug.to_owned());
        if let Some(CacheValue::Collection(cached)) = self.inner.cache.get(&key).await {
            return Ok(*cached);
        }

        let repo = CatalogRepository::new(self.pool());
        let collection = repo.get_collection_by_slug(slug).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Collection(Box::new(collection.clone())))
            .await;
        Ok(collection)
    }

    /// A product and its variants, by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no visible product has the slug.
    pub async fn product(&self, slug: &str) -> Result<ProductDetail, RepositoryError> {
        let key = CacheKey::Product(slug.to_owned());
        if let Some(CacheValue::Product(cached)) = self.inner.cache.get(&key).await {
            return Ok(*cached);
        }

        let product = CatalogRepository::new(self.pool())
            .get_product_by_slug(slug)
            .await?;
        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// The most recently added products, for the home page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_products(&self) -> Result<Vec<ProductRecord>, RepositoryError> {
        if let Some(CacheValue::LatestProducts(rows)) =
            self.inner.cache.get(&CacheKey::LatestProducts).await
        {
            return Ok(rows);
        }

        let rows = CatalogRepository::new(self.pool())
            .latest_products(HOME_PRODUCT_LIMIT)
            .await?;
        self.inner
            .cache
            .insert(
                CacheKey::LatestProducts,
                CacheValue::LatestProducts(rows.clone()),
            )
            .await;
        Ok(rows)
    }

    /// Upcoming and live drops.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn current_drops(&self) -> Result<Vec<DropRecord>, RepositoryError> {
        if let Some(CacheValue::Drops(rows)) = self.inner.cache.get(&CacheKey::Drops).await {
            return Ok(rows);
        }

        let rows = DropRepository::new(self.pool()).list_current().await?;
        self.inner
            .cache
            .insert(CacheKey::Drops, CacheValue::Drops(rows.clone()))
            .await;
        Ok(rows)
    }

    /// Published journal posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn journal_index(&self) -> Result<Vec<JournalPostRecord>, RepositoryError> {
        if let Some(CacheValue::JournalIndex(rows)) =
            self.inner.cache.get(&CacheKey::JournalIndex).await
        {
            return Ok(rows);
        }

        let rows = JournalRepository::new(self.pool()).list_published().await?;
        self.inner
            .cache
            .insert(CacheKey::JournalIndex, CacheValue::JournalIndex(rows.clone()))
            .await;
        Ok(rows)
    }
}
