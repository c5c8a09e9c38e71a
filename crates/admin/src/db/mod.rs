//! Database access for the editor console.
//!
//! Repositories write the same schema the storefront reads: `collections`,
//! `products`, `variants`, `drops`, `promotions`, `journal_posts`. Unlike
//! the storefront, listings here include unpublished rows.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod collections;
pub mod drops;
pub mod journal;
pub mod products;
pub mod promotions;

pub use collections::CollectionAdminRepository;
pub use drops::DropAdminRepository;
pub use journal::JournalAdminRepository;
pub use products::ProductAdminRepository;
pub use promotions::PromotionAdminRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The requested row does not exist.
    #[error("Not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Create the connection pool for the editor console.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database is unreachable.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error, turning unique violations into `Conflict`.
pub(crate) fn map_insert_error(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(format!("{what} already exists"));
        }
    }
    RepositoryError::Database(err)
}
