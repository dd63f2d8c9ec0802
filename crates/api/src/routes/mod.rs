//! API route definitions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use kudi_db::RepositoryError;
use kudi_shared::types::money::parse_money;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{error, warn};

use crate::AppState;

pub mod credit;
pub mod health;
pub mod wallets;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(wallets::routes())
        .merge(credit::routes())
}

/// Translates a repository error into the JSON error envelope.
pub(crate) fn error_response(err: &RepositoryError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    // Internal failures are logged loudly but never leak details to callers.
    let message = if status.is_server_error() {
        error!(error = %err, "request aborted");
        "An internal error occurred".to_string()
    } else {
        warn!(error = %err, "request rejected");
        err.to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message,
        })),
    )
        .into_response()
}

/// Parses a request money amount, rejecting malformed input.
///
/// Sign and range checks belong to the domain layer; this only guards
/// against strings that are not decimal numbers at all.
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, Response> {
    parse_money(raw).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "INVALID_AMOUNT",
                "message": "Amount must be a decimal number",
            })),
        )
            .into_response()
    })
}
