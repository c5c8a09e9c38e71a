//! Collection endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;
use verlaine_core::CollectionId;

use crate::db::CollectionAdminRepository;
use crate::db::collections::{CollectionInput, CollectionRow};
use crate::error::{AppError, Result};
use crate::middleware::RequireEditor;
use crate::state::AppState;

fn validate(input: &CollectionInput) -> Result<()> {
    if input.slug.trim().is_empty() {
        return Err(AppError::BadRequest("slug must not be empty".into()));
    }
    Ok(())
}

#[instrument(skip(_auth, state))]
pub async fn list(_auth: RequireEditor, State(state): State<AppState>) -> Result<Json<Vec<CollectionRow>>> {
    let rows = CollectionAdminRepository::new(state.pool()).list().await?;
    Ok(Json(rows))
}

#[instrument(skip(_auth, state))]
pub async fn show(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CollectionRow>> {
    let row = CollectionAdminRepository::new(state.pool())
        .get(CollectionId::new(id))
        .await?;
    Ok(Json(row))
}

#[instrument(skip(_auth, state, input))]
pub async fn create(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CollectionInput>,
) -> Result<(StatusCode, Json<CollectionRow>)> {
    validate(&input)?;
    let row = CollectionAdminRepository::new(state.pool())
        .create(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<CollectionInput>,
) -> Result<Json<CollectionRow>> {
    validate(&input)?;
    let row = CollectionAdminRepository::new(state.pool())
        .update(CollectionId::new(id), &input)
        .await?;
    Ok(Json(row))
}

#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    CollectionAdminRepository::new(state.pool())
        .delete(CollectionId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
