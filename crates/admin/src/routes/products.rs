//! Product and variant endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use tracing::instrument;
use verlaine_core::{ProductId, VariantId};

use crate::db::ProductAdminRepository;
use crate::db::products::{ProductInput, ProductRow, VariantInput, VariantRow};
use crate::error::{AppError, Result};
use crate::middleware::RequireEditor;
use crate::state::AppState;

fn validate(input: &ProductInput) -> Result<()> {
    if input.slug.trim().is_empty() {
        return Err(AppError::BadRequest("slug must not be empty".into()));
    }
    Ok(())
}

fn validate_variant(input: &VariantInput) -> Result<()> {
    if input.sku.trim().is_empty() {
        return Err(AppError::BadRequest("sku must not be empty".into()));
    }
    if input.price < Decimal::ZERO {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if input.inventory < 0 {
        return Err(AppError::BadRequest("inventory must not be negative".into()));
    }
    Ok(())
}

#[instrument(skip(_auth, state))]
pub async fn list(
    _auth: RequireEditor,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductRow>>> {
    let rows = ProductAdminRepository::new(state.pool()).list().await?;
    Ok(Json(rows))
}

#[instrument(skip(_auth, state))]
pub async fn show(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductRow>> {
    let row = ProductAdminRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?;
    Ok(Json(row))
}

#[instrument(skip(_auth, state, input))]
pub async fn create(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductRow>)> {
    validate(&input)?;
    let row = ProductAdminRepository::new(state.pool())
        .create(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductRow>> {
    validate(&input)?;
    let row = ProductAdminRepository::new(state.pool())
        .update(ProductId::new(id), &input)
        .await?;
    Ok(Json(row))
}

#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    ProductAdminRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(_auth, state))]
pub async fn list_variants(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<VariantRow>>> {
    let repo = ProductAdminRepository::new(state.pool());
    // 404 for unknown product rather than an empty list
    repo.get(ProductId::new(id)).await?;
    let rows = repo.list_variants(ProductId::new(id)).await?;
    Ok(Json(rows))
}

#[instrument(skip(_auth, state, input))]
pub async fn create_variant(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<VariantInput>,
) -> Result<(StatusCode, Json<VariantRow>)> {
    validate_variant(&input)?;
    let repo = ProductAdminRepository::new(state.pool());
    repo.get(ProductId::new(id)).await?;
    let row = repo.create_variant(ProductId::new(id), &input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(_auth, state, input))]
pub async fn update_variant(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<VariantInput>,
) -> Result<Json<VariantRow>> {
    validate_variant(&input)?;
    let row = ProductAdminRepository::new(state.pool())
        .update_variant(VariantId::new(id), &input)
        .await?;
    Ok(Json(row))
}

#[instrument(skip(_auth, state))]
pub async fn delete_variant(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    ProductAdminRepository::new(state.pool())
        .delete_variant(VariantId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
