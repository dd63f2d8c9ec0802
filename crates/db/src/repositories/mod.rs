//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! Every read-then-write operation locks the wallet row first, so racing
//! requests against the same wallet serialize instead of double-spending.

pub mod credit;
pub mod wallet;

pub use credit::{CreditRepository, OpenLineView, PurchaseRecord, RepaymentRecord};
pub use wallet::{ScoreChange, WalletRepository};

use chrono::Utc;
use kudi_core::credit::{CreditError, LedgerEffect, WalletAccount};
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{ledger_entries, wallets};

/// Error type shared by all repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A credit-domain validation or invariant failure.
    #[error(transparent)]
    Credit(#[from] CreditError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Credit(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Credit(err) => err.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// Default credit limit for lazily created wallets.
fn default_credit_limit() -> Decimal {
    Decimal::new(500, 0)
}

/// Default credit score for lazily created wallets.
const DEFAULT_CREDIT_SCORE: i32 = 600;

/// Locks the wallet row for the given user (`SELECT ... FOR UPDATE`).
pub(crate) async fn lock_wallet(
    txn: &DatabaseTransaction,
    user_id: Uuid,
) -> Result<Option<wallets::Model>, DbErr> {
    wallets::Entity::find()
        .filter(wallets::Column::UserId.eq(user_id))
        .lock_exclusive()
        .one(txn)
        .await
}

/// Locks the user's wallet row, materializing it first if it does not exist.
///
/// Wallets are created lazily on first access. The insert uses
/// `ON CONFLICT DO NOTHING` so two concurrent first-touch requests both end
/// up locking the same row instead of one of them failing.
pub(crate) async fn lock_or_create_wallet(
    txn: &DatabaseTransaction,
    user_id: Uuid,
) -> Result<wallets::Model, RepositoryError> {
    if let Some(wallet) = lock_wallet(txn, user_id).await? {
        return Ok(wallet);
    }

    let now = Utc::now().into();
    let wallet = wallets::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        cash_balance: Set(Decimal::ZERO),
        savings_balance: Set(Decimal::ZERO),
        credit_balance: Set(Decimal::ZERO),
        credit_limit: Set(default_credit_limit()),
        credit_score: Set(DEFAULT_CREDIT_SCORE),
        created_at: Set(now),
        updated_at: Set(now),
    };
    wallets::Entity::insert(wallet)
        .on_conflict(
            OnConflict::column(wallets::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;

    lock_wallet(txn, user_id)
        .await?
        .ok_or_else(|| RepositoryError::Credit(CreditError::WalletNotFound(user_id)))
}

/// Maps a wallet row into the core account type.
pub(crate) fn to_account(model: &wallets::Model) -> WalletAccount {
    WalletAccount {
        id: model.id,
        user_id: model.user_id,
        cash_balance: model.cash_balance,
        savings_balance: model.savings_balance,
        credit_balance: model.credit_balance,
        credit_limit: model.credit_limit,
        credit_score: model.credit_score,
    }
}

/// Writes the mutated account state back to the wallet row.
pub(crate) async fn persist_account(
    txn: &DatabaseTransaction,
    model: wallets::Model,
    account: &WalletAccount,
) -> Result<wallets::Model, DbErr> {
    let mut active: wallets::ActiveModel = model.into();
    active.cash_balance = Set(account.cash_balance);
    active.savings_balance = Set(account.savings_balance);
    active.credit_balance = Set(account.credit_balance);
    active.credit_limit = Set(account.credit_limit);
    active.credit_score = Set(account.credit_score);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await
}

/// Appends ledger entries for the given effects, inside the caller's
/// transaction. The ledger is append-only; rows are never touched again.
pub(crate) async fn append_effects(
    txn: &DatabaseTransaction,
    wallet_id: Uuid,
    effects: &[LedgerEffect],
) -> Result<(), DbErr> {
    let now = Utc::now().into();
    for effect in effects {
        let entry = ledger_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            wallet_id: Set(wallet_id),
            kind: Set(effect.kind.into()),
            amount: Set(effect.amount),
            description: Set(effect.description.clone()),
            created_at: Set(now),
        };
        entry.insert(txn).await?;
    }
    Ok(())
}
