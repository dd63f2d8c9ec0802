//! BNPL credit ledger logic.
//!
//! This module implements the credit-ledger engine:
//! - Wallet accounts (cash, savings, credit balances, score)
//! - Credit lines (one per financed purchase)
//! - Credit-line opening with eligibility checks
//! - Repayment allocation across concurrent credit lines
//! - Credit-score policy
//! - Error types for credit operations
//!
//! Everything here is pure: operations take state in, mutate it, and return
//! the ledger effects to persist. Transaction scoping and row locking are the
//! database layer's job.

pub mod account;
pub mod allocator;
pub mod error;
pub mod line;
pub mod policy;
pub mod score;
pub mod types;

#[cfg(test)]
mod allocator_props;

pub use account::WalletAccount;
pub use allocator::{apply_repayment, open_credit_line};
pub use error::CreditError;
pub use line::{CreditLine, LineStatus};
pub use policy::{CreditPolicy, SCORE_MAX, SCORE_MIN};
pub use score::recompute_score;
pub use types::{
    DepositTarget, LedgerEffect, LedgerKind, OpenLineRequest, PurchaseOutcome, RepaymentOutcome,
};
