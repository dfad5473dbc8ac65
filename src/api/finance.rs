//! Ledger, payment, card, pocket, and budget endpoints.

use super::AppState;
use crate::{
    core::{
        accounts::{self, CardInput, PocketInput},
        budget,
        ledger::{self, NewTransaction},
        rewards,
    },
    entities::{CardModel, PocketModel, TransactionModel, pocket},
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// GET /api/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<TransactionModel>>> {
    Ok(Json(ledger::list_transactions(&state.db).await?))
}

/// POST /api/transactions
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(new): Json<NewTransaction>,
) -> Result<(StatusCode, Json<TransactionModel>)> {
    let created = ledger::record_transaction(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/transactions/:id
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(new): Json<NewTransaction>,
) -> Result<Json<TransactionModel>> {
    Ok(Json(ledger::update_transaction(&state.db, id, new).await?))
}

/// DELETE /api/transactions/:id
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    ledger::delete_transaction(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Body for POST /api/projects/:id/payments.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Amount received
    pub amount: f64,
    /// Card the money landed on
    pub card_id: i64,
    /// Payment date; today when absent
    pub date: Option<NaiveDate>,
}

/// Response for a recorded payment.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// The income ledger entry written for the payment
    pub transaction: TransactionModel,
    /// The project with its updated `amount_paid`
    pub project: crate::entities::ProjectModel,
}

/// POST /api/projects/:id/payments
pub async fn record_payment(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Json(request): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>)> {
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let (transaction, project) =
        ledger::record_payment(&state.db, project_id, request.amount, request.card_id, date)
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(PaymentResponse {
            transaction,
            project,
        }),
    ))
}

/// GET /api/cards
pub async fn list_cards(State(state): State<AppState>) -> Result<Json<Vec<CardModel>>> {
    Ok(Json(accounts::list_cards(&state.db).await?))
}

/// POST /api/cards
pub async fn create_card(
    State(state): State<AppState>,
    Json(input): Json<CardInput>,
) -> Result<(StatusCode, Json<CardModel>)> {
    let today = Utc::now().date_naive();
    let created = accounts::create_card(&state.db, input, today).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/cards/:id
pub async fn delete_card(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    accounts::delete_card(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// A pocket as returned by the API. The reward pool's amount is derived from
/// reward entries rather than read from the stored row.
#[derive(Debug, Serialize)]
pub struct PocketResponse {
    #[serde(flatten)]
    pocket: PocketModel,
    /// For reward pools, the derived balance; equal to `amount` otherwise
    effective_amount: f64,
}

/// GET /api/pockets
pub async fn list_pockets(State(state): State<AppState>) -> Result<Json<Vec<PocketResponse>>> {
    let pockets = accounts::list_pockets(&state.db).await?;
    let mut out = Vec::with_capacity(pockets.len());
    for p in pockets {
        let effective_amount = if p.pocket_type == pocket::TYPE_REWARD_POOL {
            rewards::pool_balance(&state.db).await?
        } else {
            p.amount
        };
        out.push(PocketResponse {
            pocket: p,
            effective_amount,
        });
    }
    Ok(Json(out))
}

/// POST /api/pockets
pub async fn create_pocket(
    State(state): State<AppState>,
    Json(input): Json<PocketInput>,
) -> Result<(StatusCode, Json<PocketModel>)> {
    let created = accounts::create_pocket(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/pockets/:id
pub async fn delete_pocket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    accounts::delete_pocket(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Body for pocket deposit and withdrawal endpoints.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Card on the other side of the transfer
    pub card_id: i64,
    /// Amount to move
    pub amount: f64,
    /// Transfer date; today when absent
    pub date: Option<NaiveDate>,
}

/// Both legs of a transfer, as written to the ledger.
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    /// Expense leg on the debited side
    pub out_leg: TransactionModel,
    /// Income leg on the credited side
    pub in_leg: TransactionModel,
}

/// POST /api/pockets/:id/deposit
pub async fn deposit(
    State(state): State<AppState>,
    Path(pocket_id): Path<i64>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>)> {
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let result =
        ledger::deposit_to_pocket(&state.db, request.card_id, pocket_id, request.amount, date)
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(TransferResponse {
            out_leg: result.out_leg,
            in_leg: result.in_leg,
        }),
    ))
}

/// POST /api/pockets/:id/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    Path(pocket_id): Path<i64>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>)> {
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let result =
        ledger::withdraw_from_pocket(&state.db, pocket_id, request.card_id, request.amount, date)
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(TransferResponse {
            out_leg: result.out_leg,
            in_leg: result.in_leg,
        }),
    ))
}

/// POST /api/pockets/:id/close-period
///
/// Closes the pocket's budget period if it has ended. Responds 200 with the
/// close-out result, or 409 when the period is still running.
pub async fn close_period(
    State(state): State<AppState>,
    Path(pocket_id): Path<i64>,
) -> Result<axum::response::Response> {
    use axum::response::IntoResponse;

    let today = Utc::now().date_naive();
    match budget::close_budget_period(&state.db, pocket_id, today).await? {
        Some(result) => Ok(Json(result).into_response()),
        None => Ok((
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "error": "budget period has not ended yet" })),
        )
            .into_response()),
    }
}
