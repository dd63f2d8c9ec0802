//! Credit error types for validation and invariant failures.
//!
//! Every variant except `InvariantViolation` is an expected, recoverable
//! condition the API layer translates into a client error. An invariant
//! violation means the ledger math itself went wrong; the surrounding
//! transaction must be aborted and the failure logged loudly.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during credit-ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreditError {
    // ========== Validation Errors ==========
    /// Amount is zero, negative, or malformed.
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    /// Cash balance too low for the requested debit.
    #[error("Insufficient wallet funds")]
    InsufficientFunds,

    /// Savings balance too low for the requested withdrawal.
    #[error("Insufficient savings")]
    InsufficientSavings,

    /// Down payment is below the policy minimum.
    #[error("Down payment must be at least {minimum}")]
    DownPaymentTooLow {
        /// The minimum acceptable down payment for this purchase.
        minimum: Decimal,
    },

    /// Down payment covers the full price, so there is nothing to finance.
    #[error("Down payment cannot cover full amount for BNPL")]
    DownPaymentCoversFull,

    // ========== Business Rule Errors ==========
    /// The purchase would push the credit balance over the credit limit.
    #[error(
        "Credit limit exceeded: {credit_balance} outstanding + {principal} requested > {credit_limit} limit"
    )]
    CreditLimitExceeded {
        /// Current outstanding credit balance.
        credit_balance: Decimal,
        /// Principal the purchase would add.
        principal: Decimal,
        /// The wallet's credit limit.
        credit_limit: Decimal,
    },

    /// Repayment attempted with no active credit lines.
    #[error("No active credit purchases to repay")]
    NoActiveCredit,

    /// Credit score too low for the requested operation.
    #[error("Credit score {score} is below the required {required}")]
    CreditScoreTooLow {
        /// The wallet's current credit score.
        score: i32,
        /// The minimum score the operation requires.
        required: i32,
    },

    // ========== Lookup Errors ==========
    /// Wallet not found for the given user.
    #[error("Wallet not found for user {0}")]
    WalletNotFound(Uuid),

    // ========== Fatal Errors ==========
    /// A money invariant was broken; the enclosing transaction must abort.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl CreditError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::InsufficientSavings => "INSUFFICIENT_SAVINGS",
            Self::DownPaymentTooLow { .. } => "DOWN_PAYMENT_TOO_LOW",
            Self::DownPaymentCoversFull => "DOWN_PAYMENT_COVERS_FULL",
            Self::CreditLimitExceeded { .. } => "CREDIT_LIMIT_EXCEEDED",
            Self::NoActiveCredit => "NO_ACTIVE_CREDIT",
            Self::CreditScoreTooLow { .. } => "CREDIT_SCORE_TOO_LOW",
            Self::WalletNotFound(_) => "WALLET_NOT_FOUND",
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidAmount
            | Self::InsufficientFunds
            | Self::InsufficientSavings
            | Self::DownPaymentTooLow { .. }
            | Self::DownPaymentCoversFull
            | Self::NoActiveCredit => 400,

            // 404 Not Found
            Self::WalletNotFound(_) => 404,

            // 422 Unprocessable - business rule rejections
            Self::CreditLimitExceeded { .. } | Self::CreditScoreTooLow { .. } => 422,

            // 500 Internal Server Error - should never surface from correct logic
            Self::InvariantViolation(_) => 500,
        }
    }

    /// Returns true if this error indicates broken ledger math.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(CreditError::InvalidAmount.error_code(), "INVALID_AMOUNT");
        assert_eq!(
            CreditError::InsufficientFunds.error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            CreditError::DownPaymentTooLow { minimum: dec!(20) }.error_code(),
            "DOWN_PAYMENT_TOO_LOW"
        );
        assert_eq!(CreditError::NoActiveCredit.error_code(), "NO_ACTIVE_CREDIT");
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(CreditError::InvalidAmount.http_status_code(), 400);
        assert_eq!(
            CreditError::WalletNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            CreditError::CreditLimitExceeded {
                credit_balance: dec!(450),
                principal: dec!(80),
                credit_limit: dec!(500),
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            CreditError::InvariantViolation("negative credit balance".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_invariant_detection() {
        assert!(CreditError::InvariantViolation("x".into()).is_invariant_violation());
        assert!(!CreditError::InsufficientFunds.is_invariant_violation());
    }

    #[test]
    fn test_error_display() {
        let err = CreditError::CreditLimitExceeded {
            credit_balance: dec!(450.00),
            principal: dec!(80.00),
            credit_limit: dec!(500.00),
        };
        assert_eq!(
            err.to_string(),
            "Credit limit exceeded: 450.00 outstanding + 80.00 requested > 500.00 limit"
        );

        let err = CreditError::DownPaymentTooLow { minimum: dec!(20.00) };
        assert_eq!(err.to_string(), "Down payment must be at least 20.00");
    }
}
