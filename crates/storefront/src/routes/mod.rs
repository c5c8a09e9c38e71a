//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//! GET  /lang/{tag}             - Switch language, redirect back
//!
//! # Catalog
//! GET  /collections            - Collection listing
//! GET  /collections/{slug}     - Collection detail
//! GET  /products/{slug}        - Product detail
//! GET  /drops                  - Drop calendar
//!
//! # Editorial
//! GET  /journal                - Journal index
//! GET  /journal/{slug}         - Journal post
//! GET  /pages/{slug}           - Markdown page (maison, care, legal)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add variant (triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/promotion         - Apply a promotion code
//!
//! # Wishlist
//! GET  /wishlist               - Wishlist page
//! POST /wishlist/add           - Save a product
//! POST /wishlist/remove        - Remove a product
//!
//! # Account
//! POST /account/identify       - Identify by email (merges cart + wishlist)
//! POST /account/logout         - Forget the identification
//!
//! # Checkout
//! GET  /checkout               - Create hosted payment session, redirect
//! GET  /checkout/success       - Post-payment landing page
//! GET  /checkout/cancelled     - Cancelled-payment landing page
//!
//! # Webhooks
//! POST /webhooks/payment       - Signed payment provider events
//! ```

pub mod account;
pub mod cart;
pub mod checkout;
pub mod collections;
pub mod drops;
pub mod home;
pub mod journal;
pub mod pages;
pub mod products;
pub mod webhooks;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{slug}", get(collections::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route("/promotion", post(cart::apply_promotion))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/identify", post(account::identify))
        .route("/logout", post(account::logout))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::start))
        .route("/success", get(checkout::success))
        .route("/cancelled", get(checkout::cancelled))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Language switcher
        .route("/lang/{tag}", get(home::switch_language))
        // Catalog
        .nest("/collections", collection_routes())
        .route("/products/{slug}", get(products::show))
        .route("/drops", get(drops::index))
        // Editorial
        .route("/journal", get(journal::index))
        .route("/journal/{slug}", get(journal::show))
        .route("/pages/{slug}", get(pages::show))
        // Cart
        .nest("/cart", cart_routes())
        // Wishlist
        .nest("/wishlist", wishlist_routes())
        // Account
        .nest("/account", account_routes())
        // Checkout
        .nest("/checkout", checkout_routes())
        // Payment provider webhooks
        .route("/webhooks/payment", post(webhooks::payment))
}
