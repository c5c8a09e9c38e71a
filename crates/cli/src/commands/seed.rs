//! Demo catalog seeding.
//!
//! Loads a small bilingual catalog into an empty database so the
//! storefront has something to render locally: one collection, two
//! products with variants, a live drop, a promotion code, and a journal
//! post. Re-running is safe; existing slugs are left untouched.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Insert the demo catalog.
///
/// # Errors
///
/// Returns `SeedError` if `DATABASE_URL` is unset or a statement fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("DATABASE_URL"))?;

    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Seeding demo catalog...");

    let collection_id = seed_collection(&pool).await?;
    seed_products(&pool, collection_id).await?;
    seed_drop(&pool, collection_id).await?;
    seed_promotion(&pool).await?;
    seed_journal(&pool).await?;

    tracing::info!("Seed complete");
    Ok(())
}

async fn seed_collection(pool: &PgPool) -> Result<i32, SeedError> {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO collections (slug, name_fr, name_en, description_fr, description_en,
                                  position, published)
         VALUES ('essentiels', 'Les Essentiels', 'The Essentials',
                 'Les pièces fondatrices du vestiaire Verlaine.',
                 'The founding pieces of the Verlaine wardrobe.',
                 0, TRUE)
         ON CONFLICT (slug) DO UPDATE SET updated_at = NOW()
         RETURNING id",
    )
    .fetch_one(pool)
    .await
    .map_err(Into::into)
}

async fn seed_products(pool: &PgPool, collection_id: i32) -> Result<(), SeedError> {
    let products = [
        (
            "manteau-verlaine",
            "Manteau Verlaine",
            "The Verlaine Coat",
            "Manteau droit en laine double face, coupé à Paris.",
            "A straight-cut double-faced wool coat, cut in Paris.",
            Decimal::from(890),
            "MV-MANT",
        ),
        (
            "chemise-arthur",
            "Chemise Arthur",
            "The Arthur Shirt",
            "Chemise en popeline de Côme, col français.",
            "A Como poplin shirt with a French collar.",
            Decimal::from(240),
            "MV-CHEM",
        ),
    ];

    for (position, (slug, name_fr, name_en, desc_fr, desc_en, price, sku_prefix)) in
        products.iter().enumerate()
    {
        let product_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO products (collection_id, slug, name_fr, name_en, description_fr,
                                   description_en, currency, position, published)
             VALUES ($1, $2, $3, $4, $5, $6, 'EUR', $7, TRUE)
             ON CONFLICT (slug) DO UPDATE SET updated_at = NOW()
             RETURNING id",
        )
        .bind(collection_id)
        .bind(slug)
        .bind(name_fr)
        .bind(name_en)
        .bind(desc_fr)
        .bind(desc_en)
        .bind(i32::try_from(position).unwrap_or(0))
        .fetch_one(pool)
        .await?;

        for size in ["38", "40", "42"] {
            sqlx::query(
                "INSERT INTO variants (product_id, sku, size, color, price, inventory)
                 VALUES ($1, $2, $3, 'Noir', $4, 12)
                 ON CONFLICT (sku) DO NOTHING",
            )
            .bind(product_id)
            .bind(format!("{sku_prefix}-{size}-NOIR"))
            .bind(size)
            .bind(price)
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

async fn seed_drop(pool: &PgPool, collection_id: i32) -> Result<(), SeedError> {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO drops (collection_id, slug, title_fr, title_en, teaser_fr, teaser_en,
                            starts_at, ends_at)
         VALUES ($1, 'edition-atelier', 'Édition Atelier', 'Atelier Edition',
                 'Une série limitée coupée dans nos dernières laines.',
                 'A limited run cut from our final wool lengths.',
                 $2, $3)
         ON CONFLICT (slug) DO NOTHING",
    )
    .bind(collection_id)
    .bind(now - Duration::days(1))
    .bind(now + Duration::days(13))
    .execute(pool)
    .await?;
    Ok(())
}

async fn seed_promotion(pool: &PgPool) -> Result<(), SeedError> {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO promotions (code, description_fr, description_en, percent_off,
                                 starts_at, ends_at, active)
         VALUES ('BIENVENUE10', 'Bienvenue : 10 % sur votre première commande.',
                 'Welcome: 10% off your first order.', 10, $1, $2, TRUE)
         ON CONFLICT (UPPER(code)) DO NOTHING",
    )
    .bind(now - Duration::days(1))
    .bind(now + Duration::days(365))
    .execute(pool)
    .await?;
    Ok(())
}

async fn seed_journal(pool: &PgPool) -> Result<(), SeedError> {
    sqlx::query(
        "INSERT INTO journal_posts (slug, title_fr, title_en, excerpt_fr, excerpt_en,
                                    body_fr, body_en, published, published_at)
         VALUES ('naissance-d-un-manteau', 'Naissance d''un manteau', 'The making of a coat',
                 'Dans les coulisses de notre atelier parisien.',
                 'Behind the scenes at our Paris workshop.',
                 'Le manteau Verlaine naît d''une laine double face tissée pour nous.',
                 'The Verlaine coat begins as a double-faced wool woven for us.',
                 TRUE, NOW())
         ON CONFLICT (slug) DO NOTHING",
    )
    .execute(pool)
    .await?;
    Ok(())
}
