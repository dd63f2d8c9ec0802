//! Credit repository: BNPL purchases and repayments.
//!
//! Both mutating operations run inside a single database transaction that
//! locks the wallet row up front. Credit-line rows are only ever mutated
//! under their wallet's lock, so two racing repayments (or a purchase racing
//! a repayment) serialize; whichever transaction loses the lock race sees
//! the winner's committed state.

use chrono::Utc;
use kudi_core::credit::{
    CreditError, CreditLine, CreditPolicy, OpenLineRequest, RepaymentOutcome,
    apply_repayment, open_credit_line,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::error;
use uuid::Uuid;

use crate::entities::{credit_lines, sea_orm_active_enums::LineStatus, wallets};

use super::{
    RepositoryError, append_effects, lock_or_create_wallet, persist_account, to_account,
};

/// Result of opening a credit line.
#[derive(Debug, Clone)]
pub struct PurchaseRecord {
    /// The created credit line.
    pub line: credit_lines::Model,
    /// The wallet after the down payment and principal were applied.
    pub wallet: wallets::Model,
    /// Interest that will apply at repayment time.
    pub interest_preview: Decimal,
    /// Principal plus previewed interest.
    pub total_due_preview: Decimal,
}

/// Result of a repayment.
#[derive(Debug, Clone)]
pub struct RepaymentRecord {
    /// The allocation outcome (totals, new balances, score).
    pub outcome: RepaymentOutcome,
    /// The wallet after the repayment.
    pub wallet: wallets::Model,
}

/// An open credit line with its live due preview.
#[derive(Debug, Clone)]
pub struct OpenLineView {
    /// The credit line row.
    pub line: credit_lines::Model,
    /// Whole weeks past the due date.
    pub overdue_weeks: i64,
    /// Interest due on the remaining principal right now.
    pub interest_due: Decimal,
    /// Penalty due for the accumulated overdue weeks.
    pub penalty_due: Decimal,
    /// Remaining principal plus interest and penalty.
    pub total_due: Decimal,
}

/// Credit repository for BNPL operations.
#[derive(Debug, Clone)]
pub struct CreditRepository {
    db: DatabaseConnection,
    policy: CreditPolicy,
}

impl CreditRepository {
    /// Creates a new credit repository with the given policy.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: CreditPolicy) -> Self {
        Self { db, policy }
    }

    /// Opens a credit line: debits the down payment, raises the credit
    /// balance by the principal, and records the purchase - atomically.
    ///
    /// # Errors
    ///
    /// Returns a validation error (invalid amount, down payment too low,
    /// insufficient funds, nothing to finance, credit limit exceeded) with
    /// no side effects applied, or a database error.
    pub async fn open_credit_line(
        &self,
        user_id: Uuid,
        request: &OpenLineRequest,
    ) -> Result<PurchaseRecord, RepositoryError> {
        let txn = self.db.begin().await?;
        let wallet = lock_or_create_wallet(&txn, user_id).await?;

        let mut account = to_account(&wallet);
        let today = Utc::now().date_naive();
        let outcome = open_credit_line(&self.policy, &mut account, request, today)?;

        let updated = persist_account(&txn, wallet, &account).await?;
        let line = insert_line(&txn, &outcome.line).await?;
        append_effects(&txn, updated.id, &outcome.effects).await?;
        txn.commit().await?;

        Ok(PurchaseRecord {
            line,
            wallet: updated,
            interest_preview: outcome.interest_preview,
            total_due_preview: outcome.total_due_preview,
        })
    }

    /// Applies a cash repayment across the wallet's open credit lines,
    /// oldest due date first.
    ///
    /// # Errors
    ///
    /// Returns a validation error with no side effects applied, an
    /// `InvariantViolation` (which aborts the transaction) if the balance
    /// math breaks, or a database error.
    pub async fn apply_repayment(
        &self,
        user_id: Uuid,
        amount: Decimal,
    ) -> Result<RepaymentRecord, RepositoryError> {
        let txn = self.db.begin().await?;
        let wallet = lock_or_create_wallet(&txn, user_id).await?;

        let models = credit_lines::Entity::find()
            .filter(credit_lines::Column::WalletId.eq(wallet.id))
            .filter(credit_lines::Column::Status.eq(LineStatus::Active))
            .order_by_asc(credit_lines::Column::DueDate)
            .order_by_asc(credit_lines::Column::CreatedAt)
            .all(&txn)
            .await?;

        let mut account = to_account(&wallet);
        let mut lines: Vec<CreditLine> = models.iter().map(to_core_line).collect();
        let today = Utc::now().date_naive();
        let outcome = apply_repayment(&self.policy, &mut account, &mut lines, amount, today)?;

        for (model, line) in models.into_iter().zip(&lines) {
            if model.remaining_principal != line.remaining_principal {
                let mut active: credit_lines::ActiveModel = model.into();
                active.remaining_principal = Set(line.remaining_principal);
                active.status = Set(line.status.into());
                active.updated_at = Set(Utc::now().into());
                active.update(&txn).await?;
            }
        }

        reconcile_credit_balance(&txn, wallet.id, account.credit_balance).await?;

        let updated = persist_account(&txn, wallet, &account).await?;
        append_effects(&txn, updated.id, &outcome.effects).await?;
        txn.commit().await?;

        Ok(RepaymentRecord {
            outcome,
            wallet: updated,
        })
    }

    /// Lists a user's open credit lines with a live overdue-penalty preview.
    ///
    /// Read-only: uses the same interest/penalty formulas as the repayment
    /// allocator but mutates nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_open_lines(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<OpenLineView>, RepositoryError> {
        let Some(wallet) = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
        else {
            return Ok(Vec::new());
        };

        let models = credit_lines::Entity::find()
            .filter(credit_lines::Column::WalletId.eq(wallet.id))
            .filter(credit_lines::Column::Status.eq(LineStatus::Active))
            .order_by_asc(credit_lines::Column::DueDate)
            .order_by_asc(credit_lines::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let today = Utc::now().date_naive();
        let views = models
            .into_iter()
            .map(|model| {
                let line = to_core_line(&model);
                OpenLineView {
                    overdue_weeks: line.overdue_periods(today),
                    interest_due: line.interest_due(),
                    penalty_due: line.penalty_due(today),
                    total_due: line.amount_due(today),
                    line: model,
                }
            })
            .collect();

        Ok(views)
    }
}

/// Maps a credit-line row into the core type.
fn to_core_line(model: &credit_lines::Model) -> CreditLine {
    CreditLine {
        id: model.id,
        wallet_id: model.wallet_id,
        item_name: model.item_name.clone(),
        total_price: model.total_price,
        down_payment: model.down_payment,
        principal: model.principal,
        remaining_principal: model.remaining_principal,
        interest_rate: model.interest_rate,
        penalty_rate: model.penalty_rate,
        due_date: model.due_date,
        status: model.status.clone().into(),
    }
}

/// Inserts a newly opened credit line.
async fn insert_line(
    txn: &DatabaseTransaction,
    line: &CreditLine,
) -> Result<credit_lines::Model, DbErr> {
    let now = Utc::now().into();
    let active = credit_lines::ActiveModel {
        id: Set(line.id),
        wallet_id: Set(line.wallet_id),
        item_name: Set(line.item_name.clone()),
        total_price: Set(line.total_price),
        down_payment: Set(line.down_payment),
        principal: Set(line.principal),
        remaining_principal: Set(line.remaining_principal),
        interest_rate: Set(line.interest_rate),
        penalty_rate: Set(line.penalty_rate),
        due_date: Set(line.due_date),
        status: Set(line.status.into()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(txn).await
}

/// Verifies conservation before commit: the wallet's credit balance must
/// equal the sum of remaining principal over its non-settled lines.
///
/// A mismatch means the allocation math broke. It is logged loudly and the
/// enclosing transaction is aborted - never silently patched up.
async fn reconcile_credit_balance(
    txn: &DatabaseTransaction,
    wallet_id: Uuid,
    credit_balance: Decimal,
) -> Result<(), RepositoryError> {
    let open_sum: Decimal = credit_lines::Entity::find()
        .filter(credit_lines::Column::WalletId.eq(wallet_id))
        .filter(credit_lines::Column::Status.ne(LineStatus::Paid))
        .select_only()
        .column_as(credit_lines::Column::RemainingPrincipal.sum(), "total")
        .into_tuple::<Option<Decimal>>()
        .one(txn)
        .await?
        .flatten()
        .unwrap_or(Decimal::ZERO);

    if open_sum != credit_balance {
        error!(
            %wallet_id,
            %open_sum,
            %credit_balance,
            "credit balance diverged from open principal; aborting transaction"
        );
        return Err(RepositoryError::Credit(CreditError::InvariantViolation(
            format!(
                "credit balance {credit_balance} != open principal sum {open_sum} for wallet {wallet_id}"
            ),
        )));
    }
    Ok(())
}
