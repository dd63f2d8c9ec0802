//! Property-based tests for the repayment allocator.
//!
//! Feature: credit-ledger
//! - Conservation: credit balance always equals the sum of open principal
//! - Monotonicity: remaining principal never increases
//! - No negative balances after any repayment
//! - Oldest-due-first allocation order
//! - Credit score stays within bounds

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::account::WalletAccount;
use super::allocator::apply_repayment;
use super::line::{CreditLine, LineStatus};
use super::policy::{CreditPolicy, SCORE_MAX, SCORE_MIN};

/// Strategy to generate positive principal amounts (1.00 to 500.00).
fn principal_amount() -> impl Strategy<Value = Decimal> {
    (100i64..50_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a due-date offset in days around today (-30 to +30).
fn due_offset() -> impl Strategy<Value = i64> {
    -30i64..30i64
}

/// Strategy to generate a payment amount (0.01 to 2,000.00).
fn payment_amount() -> impl Strategy<Value = Decimal> {
    (1i64..200_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
}

/// Builds a wallet plus one active line per (principal, due offset) pair.
fn make_state(line_inputs: &[(Decimal, i64)], cash: Decimal) -> (WalletAccount, Vec<CreditLine>) {
    let wallet_id = Uuid::new_v4();
    let mut credit_balance = Decimal::ZERO;
    let lines: Vec<CreditLine> = line_inputs
        .iter()
        .map(|&(principal, offset)| {
            credit_balance += principal;
            CreditLine {
                id: Uuid::new_v4(),
                wallet_id,
                item_name: "Store Purchase".to_string(),
                total_price: principal + Decimal::TEN,
                down_payment: Decimal::TEN,
                principal,
                remaining_principal: principal,
                interest_rate: Decimal::new(5, 0),
                penalty_rate: Decimal::ONE,
                due_date: today() + chrono::Duration::days(offset),
                status: LineStatus::Active,
            }
        })
        .collect();

    let wallet = WalletAccount {
        id: wallet_id,
        user_id: Uuid::new_v4(),
        cash_balance: cash,
        savings_balance: Decimal::ZERO,
        credit_balance,
        credit_limit: credit_balance + Decimal::ONE_HUNDRED,
        credit_score: 600,
    };
    (wallet, lines)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Conservation: after any repayment, the wallet's credit balance equals
    /// the sum of remaining principal over all non-paid lines.
    #[test]
    fn prop_conservation_holds(
        line_inputs in prop::collection::vec((principal_amount(), due_offset()), 1..5),
        payment in payment_amount(),
    ) {
        let (mut wallet, mut lines) = make_state(&line_inputs, payment);

        let result = apply_repayment(
            &CreditPolicy::default(),
            &mut wallet,
            &mut lines,
            payment,
            today(),
        );
        prop_assert!(result.is_ok(), "repayment failed: {:?}", result);

        let open_sum: Decimal = lines
            .iter()
            .filter(|l| l.status != LineStatus::Paid)
            .map(|l| l.remaining_principal)
            .sum();
        prop_assert_eq!(wallet.credit_balance, open_sum);
    }

    /// Monotonicity: no line's remaining principal ever increases, and fully
    /// settled lines end at exactly zero.
    #[test]
    fn prop_remaining_principal_never_increases(
        line_inputs in prop::collection::vec((principal_amount(), due_offset()), 1..5),
        payment in payment_amount(),
    ) {
        let (mut wallet, mut lines) = make_state(&line_inputs, payment);
        let before: Vec<Decimal> = lines.iter().map(|l| l.remaining_principal).collect();

        apply_repayment(
            &CreditPolicy::default(),
            &mut wallet,
            &mut lines,
            payment,
            today(),
        ).unwrap();

        for (line, original) in lines.iter().zip(before) {
            prop_assert!(line.remaining_principal <= original);
            prop_assert!(line.remaining_principal >= Decimal::ZERO);
            if line.status == LineStatus::Paid {
                prop_assert_eq!(line.remaining_principal, Decimal::ZERO);
            }
        }
    }

    /// No negative balances: cash and credit balances stay non-negative, and
    /// cash drops by exactly the payment amount.
    #[test]
    fn prop_balances_non_negative(
        line_inputs in prop::collection::vec((principal_amount(), due_offset()), 1..5),
        payment in payment_amount(),
        extra_cash in 0i64..100_000i64,
    ) {
        let cash = payment + Decimal::new(extra_cash, 2);
        let (mut wallet, mut lines) = make_state(&line_inputs, cash);

        apply_repayment(
            &CreditPolicy::default(),
            &mut wallet,
            &mut lines,
            payment,
            today(),
        ).unwrap();

        prop_assert!(wallet.cash_balance >= Decimal::ZERO);
        prop_assert!(wallet.credit_balance >= Decimal::ZERO);
        prop_assert_eq!(wallet.cash_balance, cash - payment);
    }

    /// Oldest-due-first: the set of lines a repayment fully settles is always
    /// a prefix of the due-date ordering.
    #[test]
    fn prop_settled_lines_form_due_date_prefix(
        line_inputs in prop::collection::vec((principal_amount(), due_offset()), 2..5),
        payment in payment_amount(),
    ) {
        let (mut wallet, mut lines) = make_state(&line_inputs, payment);

        apply_repayment(
            &CreditPolicy::default(),
            &mut wallet,
            &mut lines,
            payment,
            today(),
        ).unwrap();

        let mut order: Vec<usize> = (0..lines.len()).collect();
        order.sort_by_key(|&i| lines[i].due_date);

        let mut seen_unpaid = false;
        for &i in &order {
            match lines[i].status {
                LineStatus::Paid => {
                    prop_assert!(
                        !seen_unpaid,
                        "a later-due line settled before an earlier-due one"
                    );
                }
                _ => seen_unpaid = true,
            }
        }
    }

    /// Credit score stays within [300, 1000] no matter how many settlement
    /// rewards a single repayment stacks up.
    #[test]
    fn prop_score_stays_bounded(
        line_inputs in prop::collection::vec((principal_amount(), due_offset()), 1..5),
        payment in payment_amount(),
        start_score in SCORE_MIN..=SCORE_MAX,
    ) {
        let (mut wallet, mut lines) = make_state(&line_inputs, payment);
        wallet.credit_score = start_score;

        apply_repayment(
            &CreditPolicy::default(),
            &mut wallet,
            &mut lines,
            payment,
            today(),
        ).unwrap();

        prop_assert!(wallet.credit_score >= SCORE_MIN);
        prop_assert!(wallet.credit_score <= SCORE_MAX);
    }
}
