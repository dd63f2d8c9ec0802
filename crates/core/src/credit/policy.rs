//! Credit policy knobs.
//!
//! The production defaults are fixed here; deployments can override the
//! configurable subset through `[credit]` configuration.

use kudi_shared::config::CreditConfig;
use kudi_shared::types::money::percent_of;
use rust_decimal::Decimal;

/// Lower bound of the credit-score range.
pub const SCORE_MIN: i32 = 300;
/// Upper bound of the credit-score range.
pub const SCORE_MAX: i32 = 1000;

/// Policy parameters governing BNPL credit lines.
#[derive(Debug, Clone)]
pub struct CreditPolicy {
    /// Minimum down payment as a percentage of the total price.
    pub min_down_payment_percent: Decimal,
    /// Repayment term in days for new credit lines.
    pub term_days: u32,
    /// Flat interest rate (percent) applied at repayment time.
    pub interest_rate: Decimal,
    /// Penalty rate (percent) per whole overdue week.
    pub penalty_rate: Decimal,
    /// Credit-score reward for fully settling a credit line.
    pub full_settlement_reward: i32,
    /// Credit-score reward for a partial repayment.
    pub partial_settlement_reward: i32,
    /// Minimum credit score required for a limit increase.
    pub limit_increase_min_score: i32,
    /// Multiplier applied to the credit limit on an approved increase.
    pub limit_increase_factor: Decimal,
}

impl Default for CreditPolicy {
    fn default() -> Self {
        Self {
            min_down_payment_percent: Decimal::new(20, 0),
            term_days: 14,
            interest_rate: Decimal::new(5, 0),
            penalty_rate: Decimal::ONE,
            full_settlement_reward: 10,
            partial_settlement_reward: 3,
            limit_increase_min_score: 700,
            limit_increase_factor: Decimal::new(12, 1),
        }
    }
}

impl CreditPolicy {
    /// Builds a policy from loaded configuration.
    #[must_use]
    pub fn from_config(config: &CreditConfig) -> Self {
        Self {
            min_down_payment_percent: config.min_down_payment_percent,
            term_days: config.term_days,
            interest_rate: config.interest_rate,
            penalty_rate: config.penalty_rate,
            limit_increase_min_score: config.limit_increase_min_score,
            ..Self::default()
        }
    }

    /// Returns the minimum down payment for a purchase of `total_price`.
    #[must_use]
    pub fn min_down_payment(&self, total_price: Decimal) -> Decimal {
        percent_of(total_price, self.min_down_payment_percent)
    }
}
