//! Drop listing tests against a live database.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (cargo run -p verlaine-cli -- migrate)
//! - `DATABASE_URL` in the environment
//!
//! Run with: cargo test -p verlaine-integration-tests -- --ignored

use sqlx::PgPool;
use uuid::Uuid;

use verlaine_storefront::db::drops::DropRepository;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPool::connect(&url)
        .await
        .expect("Failed to connect to database")
}

/// Insert a collection and a live drop on it, returning the drop slug.
async fn seed_live_drop(pool: &PgPool, published: bool) -> String {
    let tag = Uuid::new_v4().simple().to_string();
    let collection_id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO collections (slug, name_fr, name_en, published)
        VALUES ($1, 'Essai', 'Sample', $2)
        RETURNING id
        ",
    )
    .bind(format!("sample-{tag}"))
    .bind(published)
    .fetch_one(pool)
    .await
    .expect("Failed to insert collection");

    let slug = format!("drop-{tag}");
    sqlx::query(
        r"
        INSERT INTO drops (collection_id, slug, title_fr, title_en, starts_at, ends_at)
        VALUES ($1, $2, 'Essai', 'Sample', NOW() - INTERVAL '1 hour', NOW() + INTERVAL '1 hour')
        ",
    )
    .bind(collection_id)
    .bind(&slug)
    .execute(pool)
    .await
    .expect("Failed to insert drop");

    slug
}

#[tokio::test]
#[ignore = "Requires a live database"]
async fn test_drops_on_unpublished_collections_stay_hidden() {
    let pool = pool().await;
    let visible = seed_live_drop(&pool, true).await;
    let hidden = seed_live_drop(&pool, false).await;

    let drops = DropRepository::new(&pool).list_current().await.expect("list");
    let slugs: Vec<&str> = drops.iter().map(|d| d.slug.as_str()).collect();

    assert!(slugs.contains(&visible.as_str()));
    assert!(!slugs.contains(&hidden.as_str()));
}
