//! Wallet account state and operations.
//!
//! A wallet holds the cash balance, savings balance, aggregate outstanding
//! credit, the credit limit, and the credit score. All mutations go through
//! the methods here so the balance invariants hold after every operation:
//! no balance ever goes negative, and the credit score stays in
//! [`SCORE_MIN`, `SCORE_MAX`].

use kudi_shared::types::money::{format_money, round_money};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::CreditError;
use super::policy::{CreditPolicy, SCORE_MAX, SCORE_MIN};
use super::types::{LedgerEffect, LedgerKind};

/// A user's wallet account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    /// Wallet ID.
    pub id: Uuid,
    /// Owning user ID (1:1).
    pub user_id: Uuid,
    /// Spendable cash balance, never negative.
    pub cash_balance: Decimal,
    /// Savings balance, never negative.
    pub savings_balance: Decimal,
    /// Sum of remaining principal across open credit lines, never negative.
    pub credit_balance: Decimal,
    /// Maximum outstanding credit allowed, always positive.
    pub credit_limit: Decimal,
    /// Credit score, clamped to [300, 1000].
    pub credit_score: i32,
}

fn validate_amount(amount: Decimal) -> Result<(), CreditError> {
    if amount <= Decimal::ZERO {
        return Err(CreditError::InvalidAmount);
    }
    Ok(())
}

impl WalletAccount {
    /// Deposits cash into the wallet.
    pub fn deposit(&mut self, amount: Decimal) -> Result<LedgerEffect, CreditError> {
        validate_amount(amount)?;
        self.cash_balance = round_money(self.cash_balance + amount);
        Ok(LedgerEffect::new(
            LedgerKind::Deposit,
            amount,
            format!("\u{20b5}{} deposited into wallet", format_money(amount)),
        ))
    }

    /// Deposits cash directly into savings.
    pub fn deposit_savings(&mut self, amount: Decimal) -> Result<LedgerEffect, CreditError> {
        validate_amount(amount)?;
        self.savings_balance = round_money(self.savings_balance + amount);
        Ok(LedgerEffect::new(
            LedgerKind::Deposit,
            amount,
            format!("\u{20b5}{} deposited into savings", format_money(amount)),
        ))
    }

    /// Withdraws cash from the wallet.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<LedgerEffect, CreditError> {
        self.debit_cash(amount)?;
        Ok(LedgerEffect::new(
            LedgerKind::Withdrawal,
            amount,
            format!("\u{20b5}{} withdrawn from wallet", format_money(amount)),
        ))
    }

    /// Debits the down payment for a BNPL purchase.
    ///
    /// Same contract as [`withdraw`](Self::withdraw) but tagged as a down
    /// payment; used only by credit-line opening.
    pub fn debit_for_purchase(
        &mut self,
        amount: Decimal,
        item_name: &str,
    ) -> Result<LedgerEffect, CreditError> {
        self.debit_cash(amount)?;
        Ok(LedgerEffect::new(
            LedgerKind::DownPayment,
            amount,
            format!("Down payment for {item_name}"),
        ))
    }

    /// Moves cash into savings.
    pub fn transfer_to_savings(&mut self, amount: Decimal) -> Result<LedgerEffect, CreditError> {
        self.debit_cash(amount)?;
        self.savings_balance = round_money(self.savings_balance + amount);
        Ok(LedgerEffect::new(
            LedgerKind::Transfer,
            amount,
            format!("\u{20b5}{} moved to savings", format_money(amount)),
        ))
    }

    /// Moves savings back into cash.
    pub fn withdraw_from_savings(&mut self, amount: Decimal) -> Result<LedgerEffect, CreditError> {
        validate_amount(amount)?;
        if self.savings_balance < amount {
            return Err(CreditError::InsufficientSavings);
        }
        self.savings_balance = round_money(self.savings_balance - amount);
        self.cash_balance = round_money(self.cash_balance + amount);
        Ok(LedgerEffect::new(
            LedgerKind::Transfer,
            amount,
            format!("\u{20b5}{} withdrawn from savings", format_money(amount)),
        ))
    }

    /// Debits cash without producing a ledger effect.
    ///
    /// Callers that need a differently-tagged entry (repayment, down
    /// payment) build their own effect.
    pub(crate) fn debit_cash(&mut self, amount: Decimal) -> Result<(), CreditError> {
        validate_amount(amount)?;
        if self.cash_balance < amount {
            return Err(CreditError::InsufficientFunds);
        }
        self.cash_balance = round_money(self.cash_balance - amount);
        Ok(())
    }

    /// Increases the outstanding credit balance.
    pub(crate) fn increase_credit_balance(&mut self, amount: Decimal) {
        self.credit_balance = round_money(self.credit_balance + amount);
    }

    /// Decreases the outstanding credit balance.
    ///
    /// Driving the balance below zero means the allocator's math broke; that
    /// is an invariant violation, never a silent clamp.
    pub(crate) fn decrease_credit_balance(&mut self, amount: Decimal) -> Result<(), CreditError> {
        let next = round_money(self.credit_balance - amount);
        if next < Decimal::ZERO {
            return Err(CreditError::InvariantViolation(format!(
                "credit balance would go negative: {} - {amount}",
                self.credit_balance
            )));
        }
        self.credit_balance = next;
        Ok(())
    }

    /// Adjusts the credit score, clamping into [300, 1000].
    pub fn adjust_credit_score(&mut self, delta: i32) {
        self.credit_score = (self.credit_score + delta).clamp(SCORE_MIN, SCORE_MAX);
    }

    /// Credit headroom left under the limit.
    #[must_use]
    pub fn available_credit(&self) -> Decimal {
        round_money(self.credit_limit - self.credit_balance)
    }

    /// Raises the credit limit by the policy factor.
    ///
    /// Requires the wallet's score to meet the policy threshold. Returns the
    /// ledger effect recording the limit delta.
    pub fn increase_credit_limit(
        &mut self,
        policy: &CreditPolicy,
    ) -> Result<LedgerEffect, CreditError> {
        if self.credit_score < policy.limit_increase_min_score {
            return Err(CreditError::CreditScoreTooLow {
                score: self.credit_score,
                required: policy.limit_increase_min_score,
            });
        }
        let old_limit = self.credit_limit;
        self.credit_limit = round_money(self.credit_limit * policy.limit_increase_factor);
        Ok(LedgerEffect::new(
            LedgerKind::CreditLimitChange,
            round_money(self.credit_limit - old_limit),
            format!(
                "Credit limit raised to \u{20b5}{}",
                format_money(self.credit_limit)
            ),
        ))
    }
}
