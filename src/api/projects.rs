//! Project endpoints.
//!
//! Responses carry the stored project plus its derived payment status, which
//! is computed on the way out and never persisted.

use super::AppState;
use crate::{
    core::project::{self, PaymentStatus, ProjectInput},
    entities::ProjectModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Serialize;

/// A project with its derived payment status.
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    #[serde(flatten)]
    project: ProjectModel,
    payment_status: PaymentStatus,
    remaining_balance: f64,
}

impl From<ProjectModel> for ProjectResponse {
    fn from(project: ProjectModel) -> Self {
        let payment_status = project::payment_status(&project);
        let remaining_balance =
            crate::core::pricing::remaining_balance(project.total_cost, project.amount_paid);
        Self {
            project,
            payment_status,
            remaining_balance,
        }
    }
}

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProjectResponse>>> {
    let projects = project::list_projects(&state.db).await?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProjectInput>,
) -> Result<(StatusCode, Json<ProjectResponse>)> {
    let today = Utc::now().date_naive();
    let created = project::create_project(&state.db, input, today).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /api/projects/:id
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectResponse>> {
    Ok(Json(project::get_project(&state.db, id).await?.into()))
}

/// PUT /api/projects/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<ProjectResponse>> {
    let today = Utc::now().date_naive();
    let updated = project::update_project(&state.db, id, input, today).await?;
    Ok(Json(updated.into()))
}

/// DELETE /api/projects/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    project::delete_project(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
