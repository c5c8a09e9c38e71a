//! Cart repository tests against a live database.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (cargo run -p verlaine-cli -- migrate)
//! - `DATABASE_URL` in the environment
//!
//! Run with: cargo test -p verlaine-integration-tests -- --ignored
//!
//! They cover the inventory clamp at every cart write, in particular the
//! sold-out case: `cart_items.quantity` must stay positive, so a line
//! whose variant's inventory reached zero is removed (or skipped during
//! merge) instead of being written as zero.

use sqlx::PgPool;
use uuid::Uuid;

use verlaine_core::{CartToken, Email, VariantId};
use verlaine_storefront::db::carts::CartRepository;
use verlaine_storefront::db::users::UserRepository;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPool::connect(&url)
        .await
        .expect("Failed to connect to database")
}

/// Insert a throwaway product with one variant and return the variant ID.
async fn seed_variant(pool: &PgPool, inventory: i32) -> VariantId {
    let tag = Uuid::new_v4().simple().to_string();
    let product_id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO products (slug, name_fr, name_en, published)
        VALUES ($1, 'Essai', 'Sample', TRUE)
        RETURNING id
        ",
    )
    .bind(format!("sample-{tag}"))
    .fetch_one(pool)
    .await
    .expect("Failed to insert product");

    let id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO variants (product_id, sku, size, price, inventory)
        VALUES ($1, $2, '38', 120.00, $3)
        RETURNING id
        ",
    )
    .bind(product_id)
    .bind(format!("SKU-{tag}"))
    .bind(inventory)
    .fetch_one(pool)
    .await
    .expect("Failed to insert variant");

    VariantId::new(id)
}

async fn set_inventory(pool: &PgPool, variant_id: VariantId, inventory: i32) {
    sqlx::query("UPDATE variants SET inventory = $2 WHERE id = $1")
        .bind(variant_id)
        .bind(inventory)
        .execute(pool)
        .await
        .expect("Failed to update inventory");
}

async fn line_quantity(pool: &PgPool, token: CartToken, variant_id: VariantId) -> Option<i32> {
    sqlx::query_scalar(
        "SELECT quantity FROM cart_items WHERE cart_token = $1 AND variant_id = $2",
    )
    .bind(token)
    .bind(variant_id)
    .fetch_optional(pool)
    .await
    .expect("Failed to read cart line")
}

// ============================================================================
// Add / update clamping
// ============================================================================

#[tokio::test]
#[ignore = "Requires a live database"]
async fn test_add_clamps_to_inventory() {
    let pool = pool().await;
    let variant = seed_variant(&pool, 3).await;
    let token = CartToken::generate();
    let repo = CartRepository::new(&pool);

    repo.add_item(token, variant, 5).await.expect("add");
    assert_eq!(line_quantity(&pool, token, variant).await, Some(3));

    // Already at the ceiling: adding more must not push past it.
    repo.add_item(token, variant, 1).await.expect("add again");
    assert_eq!(line_quantity(&pool, token, variant).await, Some(3));
}

#[tokio::test]
#[ignore = "Requires a live database"]
async fn test_update_on_sold_out_variant_removes_line() {
    let pool = pool().await;
    let variant = seed_variant(&pool, 3).await;
    let token = CartToken::generate();
    let repo = CartRepository::new(&pool);

    repo.add_item(token, variant, 2).await.expect("add");
    set_inventory(&pool, variant, 0).await;

    // Clamping to zero would violate the positive-quantity check; the
    // line must be dropped and the write must not error.
    repo.set_quantity(token, variant, 2).await.expect("update");
    assert_eq!(line_quantity(&pool, token, variant).await, None);
}

// ============================================================================
// Merge on identification
// ============================================================================

#[tokio::test]
#[ignore = "Requires a live database"]
async fn test_merge_clamps_and_drops_sold_out_lines() {
    let pool = pool().await;
    let in_stock = seed_variant(&pool, 5).await;
    let sold_out = seed_variant(&pool, 2).await;
    let repo = CartRepository::new(&pool);

    let tag = Uuid::new_v4().simple().to_string();
    let email = Email::parse(&format!("client-{tag}@example.fr")).expect("valid email");
    let user = UserRepository::new(&pool)
        .get_or_create(&email)
        .await
        .expect("user");

    // First sign-in claims the cart as-is.
    let first = CartToken::generate();
    repo.add_item(first, in_stock, 2).await.expect("add");
    let owned = repo.merge_into_user(first, user.id).await.expect("claim");
    assert_eq!(owned, first);

    // A later anonymous cart holds the same variant plus one that sells
    // out before the shopper identifies again.
    let anonymous = CartToken::generate();
    repo.add_item(anonymous, in_stock, 4).await.expect("add");
    repo.add_item(anonymous, sold_out, 1).await.expect("add");
    set_inventory(&pool, sold_out, 0).await;

    let merged = repo.merge_into_user(anonymous, user.id).await.expect("merge");
    assert_eq!(merged, owned);

    // 2 + 4 clamped to the inventory of 5; the sold-out line is gone.
    assert_eq!(line_quantity(&pool, merged, in_stock).await, Some(5));
    assert_eq!(line_quantity(&pool, merged, sold_out).await, None);

    // The anonymous cart was consumed.
    let anonymous_cart = repo.load(anonymous).await.expect("load");
    assert!(anonymous_cart.is_none());
}
