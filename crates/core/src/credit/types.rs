//! Credit domain types shared between operations and the persistence layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line::CreditLine;

/// Kind of money movement recorded in the ledger.
///
/// The ledger is append-only; one entry is written per discrete movement
/// type, with the amount always recorded as a positive magnitude and the
/// direction implied by the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    /// Cash or savings deposit.
    Deposit,
    /// Cash withdrawal.
    Withdrawal,
    /// Internal move between cash and savings.
    Transfer,
    /// Principal financed by a BNPL purchase.
    CreditPurchase,
    /// Up-front cash paid at purchase time.
    DownPayment,
    /// Cash applied against open credit lines.
    Repayment,
    /// Interest charged during a repayment.
    InterestCharged,
    /// Overdue penalty charged during a repayment.
    PenaltyCharged,
    /// Credit limit adjustment.
    CreditLimitChange,
}

/// One ledger entry to append as the side effect of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEffect {
    /// The movement type.
    pub kind: LedgerKind,
    /// Positive magnitude of the movement.
    pub amount: Decimal,
    /// Human-readable description for the audit trail.
    pub description: String,
}

impl LedgerEffect {
    /// Creates a new ledger effect.
    #[must_use]
    pub fn new(kind: LedgerKind, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            kind,
            amount,
            description: description.into(),
        }
    }
}

/// Destination of a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositTarget {
    /// The spendable cash balance.
    #[default]
    Wallet,
    /// The savings balance.
    Savings,
}

/// Input for opening a new credit line.
#[derive(Debug, Clone)]
pub struct OpenLineRequest {
    /// What is being purchased.
    pub item_name: String,
    /// Full purchase price.
    pub total_price: Decimal,
    /// Cash paid up front; must meet the policy minimum percentage.
    pub down_payment: Decimal,
}

/// Result of opening a credit line.
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    /// The newly created credit line.
    pub line: CreditLine,
    /// Interest that will apply at repayment time, shown to the buyer.
    pub interest_preview: Decimal,
    /// Principal plus previewed interest.
    pub total_due_preview: Decimal,
    /// Ledger entries to append.
    pub effects: Vec<LedgerEffect>,
}

/// Result of a repayment run across a wallet's credit lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RepaymentOutcome {
    /// The full amount debited from the cash balance.
    pub amount_paid: Decimal,
    /// Total interest charged across all touched lines.
    pub total_interest: Decimal,
    /// Total penalty charged across all touched lines.
    pub total_penalty: Decimal,
    /// Number of lines fully settled.
    pub lines_settled: u32,
    /// Cash balance after the repayment.
    pub new_cash_balance: Decimal,
    /// Credit balance after the repayment.
    pub new_credit_balance: Decimal,
    /// Credit score after the repayment rewards.
    pub new_credit_score: i32,
    /// Ledger entries to append.
    pub effects: Vec<LedgerEffect>,
}
