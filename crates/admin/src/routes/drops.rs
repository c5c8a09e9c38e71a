//! Drop endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;
use verlaine_core::DropId;

use crate::db::DropAdminRepository;
use crate::db::drops::{DropInput, DropRow};
use crate::error::{AppError, Result};
use crate::middleware::RequireEditor;
use crate::state::AppState;

fn validate(input: &DropInput) -> Result<()> {
    if input.slug.trim().is_empty() {
        return Err(AppError::BadRequest("slug must not be empty".into()));
    }
    if input.ends_at <= input.starts_at {
        return Err(AppError::BadRequest(
            "ends_at must be after starts_at".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(_auth, state))]
pub async fn list(_auth: RequireEditor, State(state): State<AppState>) -> Result<Json<Vec<DropRow>>> {
    let rows = DropAdminRepository::new(state.pool()).list().await?;
    Ok(Json(rows))
}

#[instrument(skip(_auth, state, input))]
pub async fn create(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<DropInput>,
) -> Result<(StatusCode, Json<DropRow>)> {
    validate(&input)?;
    let row = DropAdminRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<DropInput>,
) -> Result<Json<DropRow>> {
    validate(&input)?;
    let row = DropAdminRepository::new(state.pool())
        .update(DropId::new(id), &input)
        .await?;
    Ok(Json(row))
}

#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    DropAdminRepository::new(state.pool())
        .delete(DropId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verlaine_core::CollectionId;

    fn input(starts: &str, ends: &str) -> DropInput {
        DropInput {
            collection_id: CollectionId::new(1),
            slug: "hiver-26".into(),
            title_fr: "Hiver 26".into(),
            title_en: "Winter 26".into(),
            teaser_fr: String::new(),
            teaser_en: String::new(),
            starts_at: starts.parse().expect("valid timestamp"),
            ends_at: ends.parse().expect("valid timestamp"),
        }
    }

    #[test]
    fn test_inverted_window_rejected() {
        let result = validate(&input("2026-11-01T10:00:00Z", "2026-10-01T10:00:00Z"));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_forward_window_accepted() {
        assert!(validate(&input("2026-10-01T10:00:00Z", "2026-11-01T10:00:00Z")).is_ok());
    }
}
