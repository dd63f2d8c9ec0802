//! Credit routes: BNPL purchases, repayments, open lines, score, limit.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use kudi_core::credit::OpenLineRequest;
use kudi_db::{CreditRepository, WalletRepository, repositories::credit::OpenLineView};
use kudi_shared::types::money::format_money;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;

use super::{error_response, parse_amount};
use super::wallets::WalletSummaryResponse;

/// Creates the credit routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/{user_id}/credit-purchase", post(make_credit_purchase))
        .route("/wallets/{user_id}/repay", post(repay_credit))
        .route("/wallets/{user_id}/credit-purchases", get(credit_purchase_list))
        .route("/wallets/{user_id}/credit-score", get(get_credit_score))
        .route("/wallets/{user_id}/credit-limit/increase", post(request_limit_increase))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a BNPL purchase.
#[derive(Debug, Deserialize)]
pub struct CreditPurchaseRequest {
    /// What is being purchased.
    #[serde(default = "default_item_name")]
    pub item_name: String,
    /// Full purchase price as a decimal string.
    pub total_price: String,
    /// Up-front cash as a decimal string.
    pub down_payment: String,
}

fn default_item_name() -> String {
    "Store Purchase".to_string()
}

/// Request body for a repayment.
#[derive(Debug, Deserialize)]
pub struct RepayRequest {
    /// Amount as a decimal string.
    pub amount: String,
}

/// One open credit line with its live due preview.
#[derive(Debug, Serialize)]
pub struct OpenLineResponse {
    /// Line ID.
    pub id: Uuid,
    /// What was purchased.
    pub item_name: String,
    /// Unpaid principal.
    pub remaining_principal: String,
    /// Due date (ISO 8601).
    pub due_date: String,
    /// Line status.
    pub status: String,
    /// Whole weeks past the due date.
    pub overdue_weeks: i64,
    /// Interest that a repayment right now would charge.
    pub interest_due: String,
    /// Penalty that a repayment right now would charge.
    pub penalty_due: String,
    /// Everything owed on this line right now.
    pub total_due: String,
}

impl From<OpenLineView> for OpenLineResponse {
    fn from(view: OpenLineView) -> Self {
        Self {
            id: view.line.id,
            item_name: view.line.item_name,
            remaining_principal: format_money(view.line.remaining_principal),
            due_date: view.line.due_date.to_string(),
            status: "ACTIVE".to_string(),
            overdue_weeks: view.overdue_weeks,
            interest_due: format_money(view.interest_due),
            penalty_due: format_money(view.penalty_due),
            total_due: format_money(view.total_due),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/wallets/{user_id}/credit-purchase` - Open a BNPL credit line.
async fn make_credit_purchase(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CreditPurchaseRequest>,
) -> impl IntoResponse {
    let total_price = match parse_amount(&payload.total_price) {
        Ok(amount) => amount,
        Err(response) => return response,
    };
    let down_payment = match parse_amount(&payload.down_payment) {
        Ok(amount) => amount,
        Err(response) => return response,
    };

    let request = OpenLineRequest {
        item_name: payload.item_name,
        total_price,
        down_payment,
    };

    let repo = CreditRepository::new((*state.db).clone(), state.policy.clone());
    match repo.open_credit_line(user_id, &request).await {
        Ok(record) => {
            // Fire-and-forget purchase event; delivery never affects the ledger.
            info!(
                target: "notification",
                %user_id,
                item_name = %record.line.item_name,
                principal = %record.line.principal,
                due_date = %record.line.due_date,
                "credit purchase completed"
            );

            (
                StatusCode::CREATED,
                Json(json!({
                    "message": format!(
                        "\u{20b5}{} purchase made. \u{20b5}{} paid now. \u{20b5}{} (incl. interest) due by {}",
                        format_money(record.line.total_price),
                        format_money(record.line.down_payment),
                        format_money(record.total_due_preview),
                        record.line.due_date,
                    ),
                    "purchase": {
                        "id": record.line.id,
                        "item_name": record.line.item_name,
                        "principal": format_money(record.line.principal),
                        "interest_preview": format_money(record.interest_preview),
                        "total_due_preview": format_money(record.total_due_preview),
                        "due_date": record.line.due_date.to_string(),
                    },
                    "wallet": WalletSummaryResponse::from_model(&record.wallet),
                })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/wallets/{user_id}/repay` - Repay open credit lines.
async fn repay_credit(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<RepayRequest>,
) -> impl IntoResponse {
    let amount = match parse_amount(&payload.amount) {
        Ok(amount) => amount,
        Err(response) => return response,
    };

    let repo = CreditRepository::new((*state.db).clone(), state.policy.clone());
    match repo.apply_repayment(user_id, amount).await {
        Ok(record) => {
            // Fire-and-forget repayment event; delivery never affects the ledger.
            info!(
                target: "notification",
                %user_id,
                amount_paid = %record.outcome.amount_paid,
                lines_settled = record.outcome.lines_settled,
                "repayment completed"
            );

            (
                StatusCode::OK,
                Json(json!({
                    "message": format!(
                        "\u{20b5}{} repaid successfully",
                        format_money(record.outcome.amount_paid)
                    ),
                    "amount_paid": format_money(record.outcome.amount_paid),
                    "interest_charged": format_money(record.outcome.total_interest),
                    "penalty_charged": format_money(record.outcome.total_penalty),
                    "lines_settled": record.outcome.lines_settled,
                    "wallet": WalletSummaryResponse::from_model(&record.wallet),
                })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/wallets/{user_id}/credit-purchases` - Open lines with due preview.
async fn credit_purchase_list(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CreditRepository::new((*state.db).clone(), state.policy.clone());
    match repo.list_open_lines(user_id).await {
        Ok(views) => {
            let purchases: Vec<OpenLineResponse> =
                views.into_iter().map(OpenLineResponse::from).collect();
            (StatusCode::OK, Json(json!({ "purchases": purchases }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/wallets/{user_id}/credit-score` - Score, limit, and balance.
async fn get_credit_score(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = WalletRepository::new((*state.db).clone());
    match repo.get_or_create(user_id).await {
        Ok(wallet) => (
            StatusCode::OK,
            Json(json!({
                "credit_score": wallet.credit_score,
                "credit_limit": format_money(wallet.credit_limit),
                "credit_balance": format_money(wallet.credit_balance),
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/wallets/{user_id}/credit-limit/increase` - Raise the credit limit.
async fn request_limit_increase(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = WalletRepository::new((*state.db).clone());
    match repo.increase_credit_limit(user_id, &state.policy).await {
        Ok(wallet) => (
            StatusCode::OK,
            Json(json!({
                "message": format!(
                    "Credit limit increased to \u{20b5}{}",
                    format_money(wallet.credit_limit)
                ),
                "wallet": WalletSummaryResponse::from_model(&wallet),
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}
