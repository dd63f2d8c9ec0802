//! Wallet routes: summary, deposits, withdrawals, savings moves, history.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use kudi_core::credit::DepositTarget;
use kudi_db::{WalletRepository, entities::wallets};
use kudi_shared::types::money::format_money;
use kudi_shared::types::pagination::{PageMeta, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;

use super::{error_response, parse_amount};

/// Creates the wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/{user_id}", get(wallet_summary))
        .route("/wallets/{user_id}/deposit", post(deposit))
        .route("/wallets/{user_id}/withdraw", post(withdraw))
        .route("/wallets/{user_id}/savings/deposit", post(deposit_to_savings))
        .route("/wallets/{user_id}/savings/withdraw", post(withdraw_from_savings))
        .route("/wallets/{user_id}/transactions", get(transaction_history))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body carrying a single money amount.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    /// Amount as a decimal string.
    pub amount: String,
}

/// Request body for a deposit.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// Amount as a decimal string.
    pub amount: String,
    /// Destination balance: "wallet" (default) or "savings".
    #[serde(default)]
    pub target: DepositTarget,
}

/// Wallet balances and credit standing.
#[derive(Debug, Serialize)]
pub struct WalletSummaryResponse {
    /// Owning user ID.
    pub user_id: Uuid,
    /// Spendable cash balance.
    pub cash_balance: String,
    /// Savings balance.
    pub savings_balance: String,
    /// Outstanding credit balance.
    pub credit_balance: String,
    /// Credit limit.
    pub credit_limit: String,
    /// Credit score.
    pub credit_score: i32,
}

impl WalletSummaryResponse {
    pub(crate) fn from_model(wallet: &wallets::Model) -> Self {
        Self {
            user_id: wallet.user_id,
            cash_balance: format_money(wallet.cash_balance),
            savings_balance: format_money(wallet.savings_balance),
            credit_balance: format_money(wallet.credit_balance),
            credit_limit: format_money(wallet.credit_limit),
            credit_score: wallet.credit_score,
        }
    }
}

/// One ledger entry in the transaction history.
#[derive(Debug, Serialize)]
pub struct LedgerEntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Movement kind.
    pub kind: &'static str,
    /// Positive magnitude of the movement.
    pub amount: String,
    /// Description for the audit trail.
    pub description: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Paginated transaction history.
#[derive(Debug, Serialize)]
pub struct TransactionHistoryResponse {
    /// Ledger entries, newest first.
    pub transactions: Vec<LedgerEntryResponse>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/wallets/{user_id}` - Wallet summary.
async fn wallet_summary(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = WalletRepository::new((*state.db).clone());
    match repo.get_or_create(user_id).await {
        Ok(wallet) => {
            (StatusCode::OK, Json(WalletSummaryResponse::from_model(&wallet))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/wallets/{user_id}/deposit` - Deposit into wallet or savings.
async fn deposit(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<DepositRequest>,
) -> impl IntoResponse {
    let amount = match parse_amount(&payload.amount) {
        Ok(amount) => amount,
        Err(response) => return response,
    };

    let repo = WalletRepository::new((*state.db).clone());
    match repo.deposit(user_id, amount, payload.target).await {
        Ok(wallet) => {
            let destination = match payload.target {
                DepositTarget::Wallet => "wallet",
                DepositTarget::Savings => "savings",
            };
            (
                StatusCode::OK,
                Json(json!({
                    "message": format!("\u{20b5}{} deposited into {destination}", format_money(amount)),
                    "wallet": WalletSummaryResponse::from_model(&wallet),
                })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/wallets/{user_id}/withdraw` - Withdraw cash.
async fn withdraw(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AmountRequest>,
) -> impl IntoResponse {
    let amount = match parse_amount(&payload.amount) {
        Ok(amount) => amount,
        Err(response) => return response,
    };

    let repo = WalletRepository::new((*state.db).clone());
    match repo.withdraw(user_id, amount).await {
        Ok(wallet) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("\u{20b5}{} withdrawn from wallet", format_money(amount)),
                "wallet": WalletSummaryResponse::from_model(&wallet),
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/wallets/{user_id}/savings/deposit` - Move cash into savings.
async fn deposit_to_savings(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AmountRequest>,
) -> impl IntoResponse {
    let amount = match parse_amount(&payload.amount) {
        Ok(amount) => amount,
        Err(response) => return response,
    };

    let repo = WalletRepository::new((*state.db).clone());
    match repo.transfer_to_savings(user_id, amount).await {
        Ok(wallet) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("\u{20b5}{} moved to savings", format_money(amount)),
                "wallet": WalletSummaryResponse::from_model(&wallet),
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/wallets/{user_id}/savings/withdraw` - Move savings back to cash.
async fn withdraw_from_savings(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AmountRequest>,
) -> impl IntoResponse {
    let amount = match parse_amount(&payload.amount) {
        Ok(amount) => amount,
        Err(response) => return response,
    };

    let repo = WalletRepository::new((*state.db).clone());
    match repo.withdraw_from_savings(user_id, amount).await {
        Ok(wallet) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("\u{20b5}{} withdrawn from savings", format_money(amount)),
                "wallet": WalletSummaryResponse::from_model(&wallet),
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/wallets/{user_id}/transactions` - Paginated ledger history.
async fn transaction_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let repo = WalletRepository::new((*state.db).clone());
    match repo.list_ledger_entries(user_id, &page).await {
        Ok(entries) => {
            let transactions = entries
                .data
                .into_iter()
                .map(|entry| LedgerEntryResponse {
                    id: entry.id,
                    kind: entry.kind.as_str(),
                    amount: format_money(entry.amount),
                    description: entry.description,
                    created_at: entry.created_at.to_rfc3339(),
                })
                .collect();

            (
                StatusCode::OK,
                Json(TransactionHistoryResponse {
                    transactions,
                    meta: entries.meta,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}
