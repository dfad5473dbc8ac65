//! Team member and reward endpoints.

use super::AppState;
use crate::{
    core::rewards::{self, MemberInput, RewardInput},
    entities::{RewardEntryModel, TeamMemberModel},
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A team member with their derived reward balance.
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    #[serde(flatten)]
    member: TeamMemberModel,
    /// Sum of the member's reward entries
    reward_balance: f64,
}

/// GET /api/team
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<MemberResponse>>> {
    let members = rewards::list_members(&state.db).await?;
    let mut out = Vec::with_capacity(members.len());
    for member in members {
        let reward_balance = rewards::member_balance(&state.db, member.id).await?;
        out.push(MemberResponse {
            member,
            reward_balance,
        });
    }
    Ok(Json(out))
}

/// POST /api/team
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<MemberInput>,
) -> Result<(StatusCode, Json<TeamMemberModel>)> {
    let created = rewards::create_member(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/team/:id/rewards
pub async fn list_rewards(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
) -> Result<Json<Vec<RewardEntryModel>>> {
    Ok(Json(rewards::entries_for_member(&state.db, member_id).await?))
}

/// Body for POST /api/team/:id/rewards.
#[derive(Debug, Deserialize)]
pub struct RewardBody {
    /// Signed: positive credits, negative withdraws
    pub amount: f64,
    pub description: String,
    /// Entry date; today when absent
    pub date: Option<NaiveDate>,
    /// Project the reward relates to, if any
    pub project_id: Option<i64>,
}

/// POST /api/team/:id/rewards
pub async fn add_reward(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
    Json(body): Json<RewardBody>,
) -> Result<(StatusCode, Json<RewardEntryModel>)> {
    let entry = rewards::add_reward_entry(
        &state.db,
        RewardInput {
            team_member_id: member_id,
            amount: body.amount,
            description: body.description,
            date: body.date.unwrap_or_else(|| Utc::now().date_naive()),
            project_id: body.project_id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/team/rewards/:id
pub async fn delete_reward(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> Result<StatusCode> {
    rewards::delete_entry(&state.db, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/team/pool
pub async fn pool(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let balance = rewards::pool_balance(&state.db).await?;
    Ok(Json(serde_json::json!({ "pool_balance": balance })))
}
