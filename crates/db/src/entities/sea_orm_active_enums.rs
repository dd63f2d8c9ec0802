//! Database enum types mapped to `SeaORM` active enums.

use kudi_core::credit::{LedgerKind, LineStatus as CoreLineStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a credit line.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "line_status")]
pub enum LineStatus {
    /// Open with outstanding principal.
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    /// Fully settled; terminal.
    #[sea_orm(string_value = "PAID")]
    Paid,
    /// Written off; terminal.
    #[sea_orm(string_value = "DEFAULTED")]
    Defaulted,
}

/// Kind of money movement recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ledger_kind")]
pub enum LedgerEntryKind {
    /// Cash or savings deposit.
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Cash withdrawal.
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
    /// Internal move between cash and savings.
    #[sea_orm(string_value = "transfer")]
    Transfer,
    /// Principal financed by a BNPL purchase.
    #[sea_orm(string_value = "credit_purchase")]
    CreditPurchase,
    /// Up-front cash paid at purchase time.
    #[sea_orm(string_value = "down_payment")]
    DownPayment,
    /// Cash applied against open credit lines.
    #[sea_orm(string_value = "repayment")]
    Repayment,
    /// Interest charged during a repayment.
    #[sea_orm(string_value = "interest_charged")]
    InterestCharged,
    /// Overdue penalty charged during a repayment.
    #[sea_orm(string_value = "penalty_charged")]
    PenaltyCharged,
    /// Credit limit adjustment.
    #[sea_orm(string_value = "credit_limit_change")]
    CreditLimitChange,
}

impl From<CoreLineStatus> for LineStatus {
    fn from(status: CoreLineStatus) -> Self {
        match status {
            CoreLineStatus::Active => Self::Active,
            CoreLineStatus::Paid => Self::Paid,
            CoreLineStatus::Defaulted => Self::Defaulted,
        }
    }
}

impl From<LineStatus> for CoreLineStatus {
    fn from(status: LineStatus) -> Self {
        match status {
            LineStatus::Active => Self::Active,
            LineStatus::Paid => Self::Paid,
            LineStatus::Defaulted => Self::Defaulted,
        }
    }
}

impl From<LedgerKind> for LedgerEntryKind {
    fn from(kind: LedgerKind) -> Self {
        match kind {
            LedgerKind::Deposit => Self::Deposit,
            LedgerKind::Withdrawal => Self::Withdrawal,
            LedgerKind::Transfer => Self::Transfer,
            LedgerKind::CreditPurchase => Self::CreditPurchase,
            LedgerKind::DownPayment => Self::DownPayment,
            LedgerKind::Repayment => Self::Repayment,
            LedgerKind::InterestCharged => Self::InterestCharged,
            LedgerKind::PenaltyCharged => Self::PenaltyCharged,
            LedgerKind::CreditLimitChange => Self::CreditLimitChange,
        }
    }
}

impl LedgerEntryKind {
    /// Wire name of the movement kind, matching the database enum value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
            Self::CreditPurchase => "credit_purchase",
            Self::DownPayment => "down_payment",
            Self::Repayment => "repayment",
            Self::InterestCharged => "interest_charged",
            Self::PenaltyCharged => "penalty_charged",
            Self::CreditLimitChange => "credit_limit_change",
        }
    }
}
