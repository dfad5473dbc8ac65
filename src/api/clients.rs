//! Client endpoints.

use super::AppState;
use crate::{
    core::client::{self, ClientInput},
    entities::ClientModel,
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

/// GET /api/clients
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ClientModel>>> {
    Ok(Json(client::list_clients(&state.db).await?))
}

/// POST /api/clients
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ClientInput>,
) -> Result<(StatusCode, Json<ClientModel>)> {
    let today = Utc::now().date_naive();
    let created = client::create_client(&state.db, input, today).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/clients/:id
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClientModel>> {
    Ok(Json(client::get_client(&state.db, id).await?))
}

/// PUT /api/clients/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ClientInput>,
) -> Result<Json<ClientModel>> {
    Ok(Json(client::update_client(&state.db, id, input).await?))
}

/// DELETE /api/clients/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    client::delete_client(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/portal/:token
///
/// Looks a client up by portal access token. An unknown token gets a plain
/// 404, not a validation message, so tokens cannot be probed for shape.
pub async fn portal(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ClientModel>> {
    client::get_client_by_portal_id(&state.db, &token)
        .await?
        .map(Json)
        .ok_or(Error::PortalTokenInvalid)
}
