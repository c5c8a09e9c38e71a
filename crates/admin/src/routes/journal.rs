//! Journal endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;
use verlaine_core::JournalPostId;

use crate::db::JournalAdminRepository;
use crate::db::journal::{JournalInput, JournalRow};
use crate::error::{AppError, Result};
use crate::middleware::RequireEditor;
use crate::state::AppState;

fn validate(input: &JournalInput) -> Result<()> {
    if input.slug.trim().is_empty() {
        return Err(AppError::BadRequest("slug must not be empty".into()));
    }
    Ok(())
}

#[instrument(skip(_auth, state))]
pub async fn list(
    _auth: RequireEditor,
    State(state): State<AppState>,
) -> Result<Json<Vec<JournalRow>>> {
    let rows = JournalAdminRepository::new(state.pool()).list().await?;
    Ok(Json(rows))
}

#[instrument(skip(_auth, state))]
pub async fn show(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<JournalRow>> {
    let row = JournalAdminRepository::new(state.pool())
        .get(JournalPostId::new(id))
        .await?;
    Ok(Json(row))
}

#[instrument(skip(_auth, state, input))]
pub async fn create(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<JournalInput>,
) -> Result<(StatusCode, Json<JournalRow>)> {
    validate(&input)?;
    let row = JournalAdminRepository::new(state.pool())
        .create(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<JournalInput>,
) -> Result<Json<JournalRow>> {
    validate(&input)?;
    let row = JournalAdminRepository::new(state.pool())
        .update(JournalPostId::new(id), &input)
        .await?;
    Ok(Json(row))
}

#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    JournalAdminRepository::new(state.pool())
        .delete(JournalPostId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
