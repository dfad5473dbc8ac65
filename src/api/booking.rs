//! Public booking form endpoints.

use super::AppState;
use crate::{
    core::booking::{self, BookingRequest, BookingResult},
    entities::{AddOn, AddOnModel, Package, PackageModel},
    errors::Result,
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use sea_orm::{EntityTrait, QueryOrder};
use serde::Serialize;

/// The public catalog: what the booking form can offer.
#[derive(Debug, Serialize)]
pub struct Catalog {
    /// Packages, with duration tiers where defined
    pub packages: Vec<PackageModel>,
    /// Add-ons available with any package
    pub add_ons: Vec<AddOnModel>,
}

/// GET /api/booking/catalog
pub async fn catalog(State(state): State<AppState>) -> Result<Json<Catalog>> {
    let packages = Package::find()
        .order_by_asc(crate::entities::package::Column::Price)
        .all(&state.db)
        .await?;
    let add_ons = AddOn::find()
        .order_by_asc(crate::entities::add_on::Column::Price)
        .all(&state.db)
        .await?;
    Ok(Json(Catalog { packages, add_ons }))
}

/// POST /api/booking
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResult>)> {
    let today = Utc::now().date_naive();
    let result = booking::submit_booking(&state.db, request, today).await?;
    Ok((StatusCode::CREATED, Json(result)))
}
