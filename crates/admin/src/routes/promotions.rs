//! Promotion endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use tracing::instrument;
use verlaine_core::PromotionId;

use crate::db::PromotionAdminRepository;
use crate::db::promotions::{PromotionInput, PromotionRow};
use crate::error::{AppError, Result};
use crate::middleware::RequireEditor;
use crate::state::AppState;

fn validate(input: &PromotionInput) -> Result<()> {
    if input.code.trim().is_empty() {
        return Err(AppError::BadRequest("code must not be empty".into()));
    }
    if input.percent_off <= Decimal::ZERO || input.percent_off > Decimal::ONE_HUNDRED {
        return Err(AppError::BadRequest(
            "percent_off must be between 0 and 100".into(),
        ));
    }
    if input.ends_at <= input.starts_at {
        return Err(AppError::BadRequest(
            "ends_at must be after starts_at".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(_auth, state))]
pub async fn list(
    _auth: RequireEditor,
    State(state): State<AppState>,
) -> Result<Json<Vec<PromotionRow>>> {
    let rows = PromotionAdminRepository::new(state.pool()).list().await?;
    Ok(Json(rows))
}

#[instrument(skip(_auth, state, input))]
pub async fn create(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<PromotionInput>,
) -> Result<(StatusCode, Json<PromotionRow>)> {
    validate(&input)?;
    let row = PromotionAdminRepository::new(state.pool())
        .create(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<PromotionInput>,
) -> Result<Json<PromotionRow>> {
    validate(&input)?;
    let row = PromotionAdminRepository::new(state.pool())
        .update(PromotionId::new(id), &input)
        .await?;
    Ok(Json(row))
}

#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    PromotionAdminRepository::new(state.pool())
        .delete(PromotionId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(percent_off: Decimal) -> PromotionInput {
        PromotionInput {
            code: "BIENVENUE10".into(),
            description_fr: String::new(),
            description_en: String::new(),
            percent_off,
            starts_at: "2026-01-01T00:00:00Z".parse().expect("valid timestamp"),
            ends_at: "2026-12-31T00:00:00Z".parse().expect("valid timestamp"),
            active: true,
        }
    }

    #[test]
    fn test_zero_percent_rejected() {
        assert!(validate(&input(Decimal::ZERO)).is_err());
    }

    #[test]
    fn test_over_hundred_rejected() {
        assert!(validate(&input(Decimal::from(101))).is_err());
    }

    #[test]
    fn test_ten_percent_accepted() {
        assert!(validate(&input(Decimal::from(10))).is_ok());
    }
}
