//! HTTP interface.
//!
//! A thin `axum` layer over the core operations: handlers deserialize input,
//! call into [`crate::core`], and serialize the result. All business rules
//! live in core; the only logic here is mapping [`Error`] variants to HTTP
//! statuses.

use crate::errors::Error;
use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;

/// Client CRUD and portal lookup handlers
pub mod clients;
/// Booking form intake and public catalog handlers
pub mod booking;
/// Ledger, payment, card, pocket, and budget handlers
pub mod finance;
/// Project CRUD handlers
pub mod projects;
/// Promo code management handlers
pub mod promos;
/// Report and CSV export handlers
pub mod reports;
/// Team member and reward handlers
pub mod team;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::ClientNotFound { .. }
            | Error::ProjectNotFound { .. }
            | Error::TransactionNotFound { .. }
            | Error::CardNotFound { .. }
            | Error::PocketNotFound { .. }
            | Error::PromoCodeNotFound { .. }
            | Error::PackageNotFound { .. }
            | Error::TeamMemberNotFound { .. }
            | Error::RewardEntryNotFound { .. }
            | Error::PortalTokenInvalid => StatusCode::NOT_FOUND,
            Error::Database(_) | Error::Io(_) | Error::Config { .. } => {
                tracing::error!("internal error: {self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        };
        let body = axum::Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Builds the application router with every endpoint mounted under `/api`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/clients", get(clients::list).post(clients::create))
        .route(
            "/clients/:id",
            get(clients::get_one).put(clients::update).delete(clients::delete),
        )
        .route("/portal/:token", get(clients::portal))
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/:id",
            get(projects::get_one).put(projects::update).delete(projects::delete),
        )
        .route("/projects/:id/payments", post(finance::record_payment))
        .route(
            "/transactions",
            get(finance::list_transactions).post(finance::create_transaction),
        )
        .route(
            "/transactions/:id",
            put(finance::update_transaction).delete(finance::delete_transaction),
        )
        .route("/transactions/export", get(reports::export_csv))
        .route("/cards", get(finance::list_cards).post(finance::create_card))
        .route("/cards/:id", axum::routing::delete(finance::delete_card))
        .route("/pockets", get(finance::list_pockets).post(finance::create_pocket))
        .route("/pockets/:id", axum::routing::delete(finance::delete_pocket))
        .route("/pockets/:id/deposit", post(finance::deposit))
        .route("/pockets/:id/withdraw", post(finance::withdraw))
        .route("/pockets/:id/close-period", post(finance::close_period))
        .route("/promos", get(promos::list).post(promos::create))
        .route("/promos/:id", put(promos::toggle))
        .route("/booking/catalog", get(booking::catalog))
        .route("/booking", post(booking::submit))
        .route("/reports/categories", get(reports::categories))
        .route("/reports/cashflow", get(reports::cashflow))
        .route("/reports/clients", get(reports::clients))
        .route("/reports/cards", get(reports::cards))
        .route("/team", get(team::list).post(team::create))
        .route("/team/:id/rewards", get(team::list_rewards).post(team::add_reward))
        .route("/team/rewards/:id", axum::routing::delete(team::delete_reward))
        .route("/team/pool", get(team::pool));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_errors_map_to_404() {
        let response = Error::ClientNotFound { id: 3 }.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = Error::PortalTokenInvalid.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_domain_errors_map_to_400() {
        let response = Error::InsufficientFunds {
            current: 100.0,
            required: 200.0,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = Error::Validation {
            message: "bad input".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_infrastructure_errors_map_to_500() {
        let response = Error::Config {
            message: "missing".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
