//! Promo code management endpoints.
//!
//! Promo codes seeded from config.toml and ones created here are the same
//! rows; the booking form matches against whatever is active at submit time.

use super::AppState;
use crate::{
    entities::{PromoCode, PromoCodeModel, promo_code},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

/// Body for POST /api/promos.
#[derive(Debug, Deserialize)]
pub struct PromoInput {
    /// Code as typed; stored uppercased
    pub code: String,
    /// `"percentage"` or `"fixed"`
    pub discount_type: String,
    /// Percent (0-100) or fixed amount, per `discount_type`
    pub discount_value: f64,
    /// Redemption cap, unlimited when absent
    pub max_usage: Option<i32>,
    /// Last valid date, inclusive
    pub expiry_date: Option<NaiveDate>,
}

fn validate_input(input: &PromoInput) -> Result<()> {
    if input.code.trim().is_empty() {
        return Err(Error::Validation {
            message: "promo code cannot be empty".to_string(),
        });
    }
    if input.discount_type != promo_code::DISCOUNT_PERCENTAGE
        && input.discount_type != promo_code::DISCOUNT_FIXED
    {
        return Err(Error::Validation {
            message: format!("unknown discount type: {}", input.discount_type),
        });
    }
    if input.discount_value <= 0.0 || !input.discount_value.is_finite() {
        return Err(Error::InvalidAmount {
            amount: input.discount_value,
        });
    }
    if input.discount_type == promo_code::DISCOUNT_PERCENTAGE && input.discount_value > 100.0 {
        return Err(Error::Validation {
            message: "percentage discount cannot exceed 100".to_string(),
        });
    }
    Ok(())
}

/// GET /api/promos
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PromoCodeModel>>> {
    Ok(Json(
        PromoCode::find()
            .order_by_asc(promo_code::Column::Code)
            .all(&state.db)
            .await?,
    ))
}

/// POST /api/promos
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<PromoInput>,
) -> Result<(StatusCode, Json<PromoCodeModel>)> {
    validate_input(&input)?;
    let created = promo_code::ActiveModel {
        code: Set(input.code.trim().to_uppercase()),
        discount_type: Set(input.discount_type.clone()),
        discount_value: Set(input.discount_value),
        is_active: Set(true),
        usage_count: Set(0),
        max_usage: Set(input.max_usage),
        expiry_date: Set(input.expiry_date),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Body for PUT /api/promos/:id.
#[derive(Debug, Deserialize)]
pub struct PromoToggle {
    /// New active state
    pub is_active: bool,
}

/// PUT /api/promos/:id
///
/// Activates or deactivates a code. Usage counts and terms are immutable
/// once bookings have referenced the code.
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<PromoToggle>,
) -> Result<Json<PromoCodeModel>> {
    let promo = PromoCode::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or(Error::PromoCodeNotFound { id })?;
    let mut active: promo_code::ActiveModel = promo.into();
    active.is_active = Set(body.is_active);
    Ok(Json(active.update(&state.db).await?))
}
