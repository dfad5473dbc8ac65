//! Report and CSV export endpoints.

use super::AppState;
use crate::{
    core::reporting::{self, CardUsage, CategorySplit, ClientProfit, MonthlyFlow},
    errors::Result,
    export,
};
use axum::{Json, extract::State, http::header, response::IntoResponse};

/// GET /api/reports/categories
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<CategorySplit>>> {
    Ok(Json(reporting::fetch_category_totals(&state.db).await?))
}

/// GET /api/reports/cashflow
pub async fn cashflow(State(state): State<AppState>) -> Result<Json<Vec<MonthlyFlow>>> {
    Ok(Json(reporting::fetch_monthly_cashflow(&state.db).await?))
}

/// GET /api/reports/clients
pub async fn clients(State(state): State<AppState>) -> Result<Json<Vec<ClientProfit>>> {
    Ok(Json(reporting::fetch_client_profitability(&state.db).await?))
}

/// GET /api/reports/cards
pub async fn cards(State(state): State<AppState>) -> Result<Json<Vec<CardUsage>>> {
    Ok(Json(reporting::fetch_card_usage(&state.db).await?))
}

/// GET /api/transactions/export
///
/// Streams the full ledger as a CSV attachment.
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let entries = crate::core::ledger::list_transactions(&state.db).await?;
    let csv = export::transactions_csv(&entries);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        csv,
    ))
}
