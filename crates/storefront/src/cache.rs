//! In-process cache for catalog and journal reads.
//!
//! These pages are read-heavy and tolerate short staleness, so hot
//! queries go through a moka cache with a TTL. Admin writes become
//! visible within one TTL without any invalidation plumbing.

use std::time::Duration;

use moka::future::Cache;

use crate::db::catalog::{CollectionRecord, CollectionWithProducts, ProductDetail, ProductRecord};
use crate::db::drops::DropRecord;
use crate::db::journal::JournalPostRecord;

/// How long a cached catalog read may be served.
pub const CACHE_TTL: Duration = Duration::from_secs(60);

const CACHE_CAPACITY: u64 = 1024;

/// Cache key for catalog, drop, and journal index reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Collections,
    Collection(String),
    Product(String),
    LatestProducts,
    Drops,
    JournalIndex,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Collections(Vec<CollectionRecord>),
    Collection(Box<CollectionWithProducts>),
    Product(Box<ProductDetail>),
    LatestProducts(Vec<ProductRecord>),
    Drops(Vec<DropRecord>),
    JournalIndex(Vec<JournalPostRecord>),
}

/// Cache over catalog reads, shared across request handlers.
pub type CatalogCache = Cache<CacheKey, CacheValue>;

/// Build the catalog cache with its TTL and capacity bounds.
#[must_use]
pub fn build_catalog_cache() -> CatalogCache {
    Cache::builder()
        .max_capacity(CACHE_CAPACITY)
        .time_to_live(CACHE_TTL)
        .build()
}
