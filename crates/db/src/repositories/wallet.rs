//! Wallet repository for account and ledger-history operations.

use kudi_core::credit::{CreditPolicy, DepositTarget, recompute_score};
use kudi_shared::types::pagination::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{ledger_entries, wallets};

use super::{
    RepositoryError, append_effects, lock_or_create_wallet, persist_account, to_account,
};

/// Result of recomputing one wallet's credit score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreChange {
    /// The wallet owner.
    pub user_id: Uuid,
    /// Score before the recompute.
    pub old_score: i32,
    /// Score after the recompute.
    pub new_score: i32,
}

/// Wallet repository for account operations.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches the user's wallet, creating it on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<wallets::Model, RepositoryError> {
        let txn = self.db.begin().await?;
        let wallet = lock_or_create_wallet(&txn, user_id).await?;
        txn.commit().await?;
        Ok(wallet)
    }

    /// Deposits cash into the wallet or savings balance.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for non-positive amounts, or a database error.
    pub async fn deposit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        target: DepositTarget,
    ) -> Result<wallets::Model, RepositoryError> {
        let txn = self.db.begin().await?;
        let wallet = lock_or_create_wallet(&txn, user_id).await?;

        let mut account = to_account(&wallet);
        let effect = match target {
            DepositTarget::Wallet => account.deposit(amount),
            DepositTarget::Savings => account.deposit_savings(amount),
        }?;

        let updated = persist_account(&txn, wallet, &account).await?;
        append_effects(&txn, updated.id, std::slice::from_ref(&effect)).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Withdraws cash from the wallet.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` or `InsufficientFunds`, or a database error.
    pub async fn withdraw(
        &self,
        user_id: Uuid,
        amount: Decimal,
    ) -> Result<wallets::Model, RepositoryError> {
        let txn = self.db.begin().await?;
        let wallet = lock_or_create_wallet(&txn, user_id).await?;

        let mut account = to_account(&wallet);
        let effect = account.withdraw(amount)?;

        let updated = persist_account(&txn, wallet, &account).await?;
        append_effects(&txn, updated.id, std::slice::from_ref(&effect)).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Moves cash into savings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` or `InsufficientFunds`, or a database error.
    pub async fn transfer_to_savings(
        &self,
        user_id: Uuid,
        amount: Decimal,
    ) -> Result<wallets::Model, RepositoryError> {
        let txn = self.db.begin().await?;
        let wallet = lock_or_create_wallet(&txn, user_id).await?;

        let mut account = to_account(&wallet);
        let effect = account.transfer_to_savings(amount)?;

        let updated = persist_account(&txn, wallet, &account).await?;
        append_effects(&txn, updated.id, std::slice::from_ref(&effect)).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Moves savings back into cash.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` or `InsufficientSavings`, or a database error.
    pub async fn withdraw_from_savings(
        &self,
        user_id: Uuid,
        amount: Decimal,
    ) -> Result<wallets::Model, RepositoryError> {
        let txn = self.db.begin().await?;
        let wallet = lock_or_create_wallet(&txn, user_id).await?;

        let mut account = to_account(&wallet);
        let effect = account.withdraw_from_savings(amount)?;

        let updated = persist_account(&txn, wallet, &account).await?;
        append_effects(&txn, updated.id, std::slice::from_ref(&effect)).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Raises the wallet's credit limit by the policy factor.
    ///
    /// # Errors
    ///
    /// Returns `CreditScoreTooLow` when the wallet does not qualify, or a
    /// database error.
    pub async fn increase_credit_limit(
        &self,
        user_id: Uuid,
        policy: &CreditPolicy,
    ) -> Result<wallets::Model, RepositoryError> {
        let txn = self.db.begin().await?;
        let wallet = lock_or_create_wallet(&txn, user_id).await?;

        let mut account = to_account(&wallet);
        let effect = account.increase_credit_limit(policy)?;

        let updated = persist_account(&txn, wallet, &account).await?;
        append_effects(&txn, updated.id, std::slice::from_ref(&effect)).await?;
        txn.commit().await?;

        info!(%user_id, new_limit = %updated.credit_limit, "credit limit raised");
        Ok(updated)
    }

    /// Recomputes one wallet's credit score from its current balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn recompute_score(&self, user_id: Uuid) -> Result<ScoreChange, RepositoryError> {
        let txn = self.db.begin().await?;
        let wallet = lock_or_create_wallet(&txn, user_id).await?;

        let mut account = to_account(&wallet);
        let old_score = account.credit_score;
        let new_score = recompute_score(&mut account);

        persist_account(&txn, wallet, &account).await?;
        txn.commit().await?;

        Ok(ScoreChange {
            user_id,
            old_score,
            new_score,
        })
    }

    /// Recomputes credit scores for every wallet, one transaction each.
    ///
    /// Used by the periodic scorer job.
    ///
    /// # Errors
    ///
    /// Returns an error if listing wallets or any per-wallet update fails.
    pub async fn recompute_all_scores(&self) -> Result<Vec<ScoreChange>, RepositoryError> {
        let user_ids: Vec<Uuid> = wallets::Entity::find()
            .select_only()
            .column(wallets::Column::UserId)
            .order_by_asc(wallets::Column::CreatedAt)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut changes = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            changes.push(self.recompute_score(user_id).await?);
        }
        Ok(changes)
    }

    /// Lists a wallet's ledger history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_ledger_entries(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> Result<PageResponse<ledger_entries::Model>, RepositoryError> {
        let wallet = self.get_or_create(user_id).await?;

        let query = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::WalletId.eq(wallet.id));

        let total = query.clone().count(&self.db).await?;
        let entries = query
            .order_by_desc(ledger_entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(entries, page.page, page.per_page, total))
    }
}
