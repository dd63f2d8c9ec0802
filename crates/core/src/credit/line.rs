//! Credit lines: one financed purchase each.
//!
//! Interest and penalty are computed at repayment (or preview) time against
//! the current remaining principal. Nothing accrues into the stored balance,
//! so no scheduled job has to tick lines forward.

use chrono::NaiveDate;
use kudi_shared::types::money::{percent_of, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a credit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineStatus {
    /// Open with outstanding principal.
    Active,
    /// Remaining principal reached zero; terminal.
    Paid,
    /// Written off by a business decision; terminal.
    Defaulted,
}

/// A single BNPL purchase with its own principal, rates, and due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditLine {
    /// Line ID.
    pub id: Uuid,
    /// Owning wallet ID.
    pub wallet_id: Uuid,
    /// What was purchased.
    pub item_name: String,
    /// Full purchase price.
    pub total_price: Decimal,
    /// Cash paid up front.
    pub down_payment: Decimal,
    /// Financed portion (total price minus down payment).
    pub principal: Decimal,
    /// Unpaid principal; monotonically non-increasing.
    pub remaining_principal: Decimal,
    /// Interest rate (percent), fixed at creation.
    pub interest_rate: Decimal,
    /// Penalty rate (percent) per whole overdue week, fixed at creation.
    pub penalty_rate: Decimal,
    /// Date the full balance falls due.
    pub due_date: NaiveDate,
    /// Current lifecycle status.
    pub status: LineStatus,
}

impl CreditLine {
    /// Returns true while the line still carries outstanding principal.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == LineStatus::Active
    }

    /// Interest due on the current remaining principal.
    #[must_use]
    pub fn interest_due(&self) -> Decimal {
        percent_of(self.remaining_principal, self.interest_rate)
    }

    /// Whole weeks elapsed past the due date; partial weeks do not count.
    #[must_use]
    pub fn overdue_periods(&self, today: NaiveDate) -> i64 {
        if today > self.due_date {
            (today - self.due_date).num_days() / 7
        } else {
            0
        }
    }

    /// Penalty due for the whole overdue weeks accumulated so far.
    #[must_use]
    pub fn penalty_due(&self, today: NaiveDate) -> Decimal {
        let periods = self.overdue_periods(today);
        if periods == 0 {
            return Decimal::ZERO;
        }
        round_money(
            self.remaining_principal * self.penalty_rate / Decimal::ONE_HUNDRED
                * Decimal::from(periods),
        )
    }

    /// Everything owed on this line right now: principal, interest, penalty.
    #[must_use]
    pub fn amount_due(&self, today: NaiveDate) -> Decimal {
        round_money(self.remaining_principal + self.interest_due() + self.penalty_due(today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(remaining: Decimal, due_date: NaiveDate) -> CreditLine {
        CreditLine {
            id: Uuid::new_v4(),
            wallet_id: Uuid::new_v4(),
            item_name: "Store Purchase".to_string(),
            total_price: dec!(100.00),
            down_payment: dec!(20.00),
            principal: dec!(80.00),
            remaining_principal: remaining,
            interest_rate: dec!(5.00),
            penalty_rate: dec!(1.00),
            due_date,
            status: LineStatus::Active,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_interest_on_remaining_principal() {
        let l = line(dec!(80.00), date(2026, 3, 1));
        assert_eq!(l.interest_due(), dec!(4.00));

        let half_paid = line(dec!(40.00), date(2026, 3, 1));
        assert_eq!(half_paid.interest_due(), dec!(2.00));
    }

    #[test]
    fn test_no_penalty_before_due_date() {
        let l = line(dec!(80.00), date(2026, 3, 1));
        assert_eq!(l.overdue_periods(date(2026, 3, 1)), 0);
        assert_eq!(l.penalty_due(date(2026, 2, 20)), dec!(0));
    }

    #[rstest::rstest]
    #[case::one_day_late(2, 0)]
    #[case::six_days_late(7, 0)]
    #[case::exactly_one_week(8, 1)]
    #[case::ten_days_late(11, 1)]
    #[case::two_whole_weeks(16, 2)]
    fn test_overdue_periods_count_whole_weeks(#[case] day: u32, #[case] expected: i64) {
        let l = line(dec!(80.00), date(2026, 3, 1));
        assert_eq!(l.overdue_periods(date(2026, 3, day)), expected);
    }

    #[test]
    fn test_whole_weeks_accrue_penalty() {
        let l = line(dec!(80.00), date(2026, 3, 1));
        // 10 days late: one whole week
        assert_eq!(l.penalty_due(date(2026, 3, 11)), dec!(0.80));
        // 15 days late: two whole weeks
        assert_eq!(l.penalty_due(date(2026, 3, 16)), dec!(1.60));
    }

    #[test]
    fn test_amount_due_breakdown() {
        let l = line(dec!(80.00), date(2026, 3, 1));
        // not overdue: 80 + 4.00 + 0
        assert_eq!(l.amount_due(date(2026, 3, 1)), dec!(84.00));
        // overdue by 10 days (1 whole week): 80 + 4.00 + 0.80
        assert_eq!(l.amount_due(date(2026, 3, 11)), dec!(84.80));
    }
}
