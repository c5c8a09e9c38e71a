//! Editor API routes.
//!
//! All routes live under `/api` and require the shared bearer token:
//!
//! - `GET/POST /api/collections`, `GET/PUT/DELETE /api/collections/{id}`
//! - `GET/POST /api/products`, `GET/PUT/DELETE /api/products/{id}`
//! - `GET/POST /api/products/{id}/variants`, `PUT/DELETE /api/variants/{id}`
//! - `GET/POST /api/drops`, `PUT/DELETE /api/drops/{id}`
//! - `GET/POST /api/promotions`, `PUT/DELETE /api/promotions/{id}`
//! - `GET/POST /api/journal`, `GET/PUT/DELETE /api/journal/{id}`

use axum::Router;
use axum::routing::{get, put};

use crate::state::AppState;

pub mod collections;
pub mod drops;
pub mod journal;
pub mod products;
pub mod promotions;

/// Build the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/collections",
            get(collections::list).post(collections::create),
        )
        .route(
            "/collections/{id}",
            get(collections::show)
                .put(collections::update)
                .delete(collections::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/products/{id}/variants",
            get(products::list_variants).post(products::create_variant),
        )
        .route(
            "/variants/{id}",
            put(products::update_variant).delete(products::delete_variant),
        )
        .route("/drops", get(drops::list).post(drops::create))
        .route("/drops/{id}", put(drops::update).delete(drops::delete))
        .route("/promotions", get(promotions::list).post(promotions::create))
        .route(
            "/promotions/{id}",
            put(promotions::update).delete(promotions::delete),
        )
        .route("/journal", get(journal::list).post(journal::create))
        .route(
            "/journal/{id}",
            get(journal::show)
                .put(journal::update)
                .delete(journal::delete),
        )
}
