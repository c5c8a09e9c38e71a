//! Database operations for the storefront `PostgreSQL`.
//!
//! # Database: `verlaine`
//!
//! One database backs both the storefront and the editor console; the
//! console writes catalog content, the storefront reads it and owns the
//! transactional tables.
//!
//! ## Tables
//!
//! - `users` - Shoppers identified by email
//! - `collections` / `products` / `variants` - Bilingual catalog
//! - `drops` - Time-boxed releases tied to a collection
//! - `promotions` - Percent-off codes with validity windows
//! - `journal_posts` - Editorial posts (markdown, bilingual)
//! - `carts` / `cart_items` - Cookie-identified shopping carts
//! - `wishlists` / `wishlist_items` - Cookie-identified wishlists
//! - `orders` / `order_lines` / `payments` - Created by the payment webhook
//! - `tower_sessions.session` - Session storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p verlaine-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod carts;
pub mod catalog;
pub mod drops;
pub mod journal;
pub mod orders;
pub mod promotions;
pub mod users;
pub mod wishlists;

pub use carts::CartRepository;
pub use catalog::CatalogRepository;
pub use drops::DropRepository;
pub use journal::JournalRepository;
pub use orders::OrderRepository;
pub use promotions::PromotionRepository;
pub use users::UserRepository;
pub use wishlists::WishlistRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be interpreted (bad enum string, etc.).
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
