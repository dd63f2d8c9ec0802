//! Periodic credit-score policy.
//!
//! The checks are sequential and independent, not mutually exclusive tiers:
//! a wallet with low utilization and healthy savings collects both rewards
//! in one pass. Each adjustment clamps into [300, 1000].

use rust_decimal::Decimal;

use super::account::WalletAccount;

/// Recomputes a wallet's credit score from its current balances.
///
/// Invoked on a recurring cadence by the scorer job, not on every
/// transaction. Returns the new score.
pub fn recompute_score(wallet: &mut WalletAccount) -> i32 {
    let high_utilization = wallet.credit_limit * Decimal::new(8, 1);
    let low_utilization = wallet.credit_limit * Decimal::new(5, 1);

    if wallet.credit_balance == Decimal::ZERO {
        wallet.adjust_credit_score(10);
    } else if wallet.credit_balance > high_utilization {
        wallet.adjust_credit_score(-15);
    } else if wallet.credit_balance < low_utilization {
        wallet.adjust_credit_score(5);
    }

    if wallet.savings_balance > wallet.credit_balance * Decimal::new(5, 1) {
        wallet.adjust_credit_score(3);
    }

    wallet.credit_score
}
