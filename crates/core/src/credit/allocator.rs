//! Credit-line opening and repayment allocation.
//!
//! Both operations are pure: they validate, mutate the in-memory wallet and
//! lines, and return the ledger effects to persist. The database layer runs
//! them inside a single transaction holding the wallet row lock, so the
//! all-or-nothing contract is the transaction boundary's job.

use chrono::{Duration, NaiveDate};
use kudi_shared::types::money::{format_money, percent_of, round_money};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::account::WalletAccount;
use super::error::CreditError;
use super::line::{CreditLine, LineStatus};
use super::policy::CreditPolicy;
use super::types::{
    LedgerEffect, LedgerKind, OpenLineRequest, PurchaseOutcome, RepaymentOutcome,
};

/// Opens a new credit line against a wallet.
///
/// Validation is fail-fast, in a fixed order so each failure mode has a
/// distinct error: invalid price, down payment below the policy minimum,
/// insufficient cash for the down payment, nothing left to finance, and
/// finally the credit limit check on the principal.
///
/// On success the down payment has been debited, the credit balance raised
/// by the principal, and the new line is returned together with the
/// `down_payment` and `credit_purchase` ledger effects.
///
/// # Errors
///
/// Returns `CreditError` if any validation step fails; the wallet is left
/// untouched in that case.
pub fn open_credit_line(
    policy: &CreditPolicy,
    wallet: &mut WalletAccount,
    request: &OpenLineRequest,
    today: NaiveDate,
) -> Result<PurchaseOutcome, CreditError> {
    if request.total_price <= Decimal::ZERO {
        return Err(CreditError::InvalidAmount);
    }

    let down_payment = round_money(request.down_payment);
    let minimum = policy.min_down_payment(request.total_price);
    if down_payment < minimum {
        return Err(CreditError::DownPaymentTooLow { minimum });
    }

    if wallet.cash_balance < down_payment {
        return Err(CreditError::InsufficientFunds);
    }

    let principal = round_money(request.total_price - down_payment);
    if principal <= Decimal::ZERO {
        return Err(CreditError::DownPaymentCoversFull);
    }

    if principal > wallet.available_credit() {
        return Err(CreditError::CreditLimitExceeded {
            credit_balance: wallet.credit_balance,
            principal,
            credit_limit: wallet.credit_limit,
        });
    }

    let down_effect = wallet.debit_for_purchase(down_payment, &request.item_name)?;
    wallet.increase_credit_balance(principal);

    let line = CreditLine {
        id: Uuid::new_v4(),
        wallet_id: wallet.id,
        item_name: request.item_name.clone(),
        total_price: round_money(request.total_price),
        down_payment,
        principal,
        remaining_principal: principal,
        interest_rate: policy.interest_rate,
        penalty_rate: policy.penalty_rate,
        due_date: today + Duration::days(i64::from(policy.term_days)),
        status: LineStatus::Active,
    };

    let interest_preview = percent_of(principal, policy.interest_rate);
    let total_due_preview = round_money(principal + interest_preview);

    let effects = vec![
        down_effect,
        LedgerEffect::new(
            LedgerKind::CreditPurchase,
            principal,
            format!("BNPL principal for {}", request.item_name),
        ),
    ];

    Ok(PurchaseOutcome {
        line,
        interest_preview,
        total_due_preview,
        effects,
    })
}

/// Applies a cash repayment across a wallet's open credit lines.
///
/// Lines are settled strictly oldest-due-first, so the most overdue debt is
/// always cleared before newer obligations and penalty growth stays bounded.
/// Per line, interest and any whole-week overdue penalty are computed
/// against the current remaining principal; a payment large enough settles
/// the line in full (score +10), otherwise the last line touched is paid
/// down proportionally (score +3) and the payment is exhausted.
///
/// The full `cash_amount` is debited from the cash balance exactly once
/// after the allocation loop, even when it exceeds everything owed.
///
/// # Errors
///
/// Returns `CreditError` on a non-positive amount, insufficient cash, no
/// active lines, or - fatally - an invariant violation in the balance math.
pub fn apply_repayment(
    policy: &CreditPolicy,
    wallet: &mut WalletAccount,
    lines: &mut [CreditLine],
    cash_amount: Decimal,
    today: NaiveDate,
) -> Result<RepaymentOutcome, CreditError> {
    if cash_amount <= Decimal::ZERO {
        return Err(CreditError::InvalidAmount);
    }
    if wallet.cash_balance < cash_amount {
        return Err(CreditError::InsufficientFunds);
    }

    // Oldest obligation first; stable sort keeps creation order for ties.
    let mut order: Vec<usize> = (0..lines.len()).filter(|&i| lines[i].is_open()).collect();
    if order.is_empty() {
        return Err(CreditError::NoActiveCredit);
    }
    order.sort_by_key(|&i| lines[i].due_date);

    let mut remaining_payment = cash_amount;
    let mut total_interest = Decimal::ZERO;
    let mut total_penalty = Decimal::ZERO;
    let mut lines_settled = 0u32;

    for &i in &order {
        if remaining_payment <= Decimal::ZERO {
            break;
        }
        let line = &mut lines[i];

        let interest = line.interest_due();
        let penalty = line.penalty_due(today);
        let amount_due_now = round_money(line.remaining_principal + interest + penalty);

        if remaining_payment >= amount_due_now {
            // Full settlement; the line never reopens.
            remaining_payment = round_money(remaining_payment - amount_due_now);
            wallet.decrease_credit_balance(line.remaining_principal)?;
            line.remaining_principal = Decimal::ZERO;
            line.status = LineStatus::Paid;
            wallet.adjust_credit_score(policy.full_settlement_reward);
            lines_settled += 1;
        } else {
            // Partial settlement: allocate the leftover proportionally to
            // principal. Necessarily the last line touched.
            let fraction = remaining_payment / amount_due_now;
            let principal_paid = round_money(line.remaining_principal * fraction);
            wallet.decrease_credit_balance(principal_paid)?;
            line.remaining_principal = round_money(line.remaining_principal - principal_paid);
            remaining_payment = Decimal::ZERO;
            wallet.adjust_credit_score(policy.partial_settlement_reward);
        }

        total_interest = round_money(total_interest + interest);
        total_penalty = round_money(total_penalty + penalty);
    }

    // The full original amount leaves the wallet exactly once.
    wallet.debit_cash(cash_amount)?;

    let mut effects = vec![LedgerEffect::new(
        LedgerKind::Repayment,
        cash_amount,
        format!(
            "Credit repayment (interest \u{20b5}{}, penalty \u{20b5}{})",
            format_money(total_interest),
            format_money(total_penalty)
        ),
    )];
    if total_interest > Decimal::ZERO {
        effects.push(LedgerEffect::new(
            LedgerKind::InterestCharged,
            total_interest,
            "Interest charged at repayment".to_string(),
        ));
    }
    if total_penalty > Decimal::ZERO {
        effects.push(LedgerEffect::new(
            LedgerKind::PenaltyCharged,
            total_penalty,
            "Overdue penalty charged at repayment".to_string(),
        ));
    }

    Ok(RepaymentOutcome {
        amount_paid: cash_amount,
        total_interest,
        total_penalty,
        lines_settled,
        new_cash_balance: wallet.cash_balance,
        new_credit_balance: wallet.credit_balance,
        new_credit_score: wallet.credit_score,
        effects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wallet(cash: Decimal, credit: Decimal, limit: Decimal) -> WalletAccount {
        WalletAccount {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            cash_balance: cash,
            savings_balance: dec!(0),
            credit_balance: credit,
            credit_limit: limit,
            credit_score: 600,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(total: Decimal, down: Decimal) -> OpenLineRequest {
        OpenLineRequest {
            item_name: "Store Purchase".to_string(),
            total_price: total,
            down_payment: down,
        }
    }

    fn open_line(
        wallet: &mut WalletAccount,
        total: Decimal,
        down: Decimal,
        today: NaiveDate,
    ) -> CreditLine {
        open_credit_line(&CreditPolicy::default(), wallet, &request(total, down), today)
            .unwrap()
            .line
    }

    // ========== open_credit_line ==========

    #[test]
    fn test_purchase_basic_flow() {
        let mut w = wallet(dec!(100), dec!(0), dec!(500));
        let today = date(2026, 2, 15);
        let outcome = open_credit_line(
            &CreditPolicy::default(),
            &mut w,
            &request(dec!(100), dec!(20)),
            today,
        )
        .unwrap();

        assert_eq!(outcome.line.down_payment, dec!(20.00));
        assert_eq!(outcome.line.principal, dec!(80.00));
        assert_eq!(outcome.line.remaining_principal, dec!(80.00));
        assert_eq!(outcome.line.due_date, date(2026, 3, 1));
        assert_eq!(outcome.line.status, LineStatus::Active);
        assert_eq!(w.cash_balance, dec!(80.00));
        assert_eq!(w.credit_balance, dec!(80.00));

        assert_eq!(outcome.interest_preview, dec!(4.00));
        assert_eq!(outcome.total_due_preview, dec!(84.00));

        let kinds: Vec<_> = outcome.effects.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![LedgerKind::DownPayment, LedgerKind::CreditPurchase]);
    }

    #[test]
    fn test_purchase_rejects_invalid_price() {
        let mut w = wallet(dec!(100), dec!(0), dec!(500));
        let err = open_credit_line(
            &CreditPolicy::default(),
            &mut w,
            &request(dec!(0), dec!(0)),
            date(2026, 2, 15),
        )
        .unwrap_err();
        assert_eq!(err, CreditError::InvalidAmount);
    }

    #[test]
    fn test_purchase_rejects_low_down_payment() {
        let mut w = wallet(dec!(100), dec!(0), dec!(500));
        let err = open_credit_line(
            &CreditPolicy::default(),
            &mut w,
            &request(dec!(100), dec!(19.99)),
            date(2026, 2, 15),
        )
        .unwrap_err();
        assert_eq!(err, CreditError::DownPaymentTooLow { minimum: dec!(20.00) });
        assert_eq!(w.cash_balance, dec!(100));
    }

    #[test]
    fn test_purchase_rejects_insufficient_cash() {
        let mut w = wallet(dec!(19), dec!(0), dec!(500));
        let err = open_credit_line(
            &CreditPolicy::default(),
            &mut w,
            &request(dec!(100), dec!(20)),
            date(2026, 2, 15),
        )
        .unwrap_err();
        assert_eq!(err, CreditError::InsufficientFunds);
    }

    #[test]
    fn test_purchase_rejects_full_down_payment() {
        let mut w = wallet(dec!(200), dec!(0), dec!(500));
        let err = open_credit_line(
            &CreditPolicy::default(),
            &mut w,
            &request(dec!(100), dec!(100)),
            date(2026, 2, 15),
        )
        .unwrap_err();
        assert_eq!(err, CreditError::DownPaymentCoversFull);
    }

    #[test]
    fn test_purchase_rejects_over_limit() {
        // credit_limit=500, existing credit_balance=450, principal=80 -> 530 > 500
        let mut w = wallet(dec!(100), dec!(450), dec!(500));
        let err = open_credit_line(
            &CreditPolicy::default(),
            &mut w,
            &request(dec!(100), dec!(20)),
            date(2026, 2, 15),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CreditError::CreditLimitExceeded {
                credit_balance: dec!(450),
                principal: dec!(80.00),
                credit_limit: dec!(500),
            }
        );
        // no side effects applied
        assert_eq!(w.cash_balance, dec!(100));
        assert_eq!(w.credit_balance, dec!(450));
    }

    // ========== apply_repayment ==========

    #[test]
    fn test_repay_exact_settlement_no_overdue() {
        let today = date(2026, 2, 15);
        let mut w = wallet(dec!(104), dec!(0), dec!(500));
        let mut lines = vec![open_line(&mut w, dec!(100), dec!(20), today)];

        // 80 principal + 4.00 interest, not overdue
        let outcome = apply_repayment(
            &CreditPolicy::default(),
            &mut w,
            &mut lines,
            dec!(84.00),
            today,
        )
        .unwrap();

        assert_eq!(lines[0].status, LineStatus::Paid);
        assert_eq!(lines[0].remaining_principal, dec!(0));
        assert_eq!(outcome.total_interest, dec!(4.00));
        assert_eq!(outcome.total_penalty, dec!(0.00));
        assert_eq!(outcome.lines_settled, 1);
        assert_eq!(w.credit_balance, dec!(0.00));
        assert_eq!(w.cash_balance, dec!(0.00));
        assert_eq!(w.credit_score, 610);
    }

    #[test]
    fn test_repay_overdue_one_week() {
        let today = date(2026, 2, 15);
        let mut w = wallet(dec!(200), dec!(0), dec!(500));
        let mut lines = vec![open_line(&mut w, dec!(100), dec!(20), today)];

        // due today+14 = Mar 1; pay 10 days late -> 1 whole week overdue
        let pay_day = date(2026, 3, 11);
        let outcome = apply_repayment(
            &CreditPolicy::default(),
            &mut w,
            &mut lines,
            dec!(84.80),
            pay_day,
        )
        .unwrap();

        assert_eq!(outcome.total_interest, dec!(4.00));
        assert_eq!(outcome.total_penalty, dec!(0.80));
        assert_eq!(lines[0].status, LineStatus::Paid);
        let kinds: Vec<_> = outcome.effects.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LedgerKind::Repayment,
                LedgerKind::InterestCharged,
                LedgerKind::PenaltyCharged
            ]
        );
    }

    #[test]
    fn test_repay_partial_proportional_allocation() {
        let today = date(2026, 2, 15);
        let mut w = wallet(dec!(200), dec!(0), dec!(500));
        let mut lines = vec![open_line(&mut w, dec!(100), dec!(20), today)];

        // amount due = 84.80 (1 week overdue); pay exactly half
        let pay_day = date(2026, 3, 11);
        let outcome = apply_repayment(
            &CreditPolicy::default(),
            &mut w,
            &mut lines,
            dec!(42.40),
            pay_day,
        )
        .unwrap();

        assert_eq!(lines[0].remaining_principal, dec!(40.00));
        assert_eq!(lines[0].status, LineStatus::Active);
        assert_eq!(outcome.lines_settled, 0);
        assert_eq!(w.credit_balance, dec!(40.00));
        assert_eq!(w.credit_score, 603);
    }

    #[test]
    fn test_repay_oldest_due_first() {
        let today = date(2026, 2, 15);
        let mut w = wallet(dec!(500), dec!(0), dec!(500));

        // Opened newer-first so creation order disagrees with due-date order.
        let mut line_b = open_line(&mut w, dec!(120), dec!(24), today); // due Mar 1
        let mut line_a = open_line(&mut w, dec!(100), dec!(20), today); // due Feb 22
        line_a.due_date = date(2026, 2, 22);
        line_b.due_date = date(2026, 3, 1);
        let mut lines = vec![line_b.clone(), line_a.clone()];

        // line_a due: 80 + 4.00 = 84.00; pay enough for exactly one line
        let outcome = apply_repayment(
            &CreditPolicy::default(),
            &mut w,
            &mut lines,
            dec!(84.00),
            today,
        )
        .unwrap();

        // The earlier-due line settles first regardless of slice order.
        assert_eq!(lines[1].id, line_a.id);
        assert_eq!(lines[1].status, LineStatus::Paid);
        assert_eq!(lines[0].status, LineStatus::Active);
        assert_eq!(lines[0].remaining_principal, dec!(96.00));
        assert_eq!(outcome.lines_settled, 1);
    }

    #[test]
    fn test_repay_spills_into_second_line() {
        // Two lines with dues 50 and 100; repaying 60 settles the first and
        // applies the remaining 10 to the second.
        let today = date(2026, 2, 15);
        let mut w = wallet(dec!(500), dec!(0), dec!(1000));
        let mut first = open_line(&mut w, dec!(62.50), dec!(12.50), today); // principal 50
        let mut second = open_line(&mut w, dec!(125), dec!(25), today); // principal 100
        first.due_date = date(2026, 2, 20);
        first.interest_rate = dec!(0);
        second.due_date = date(2026, 2, 25);
        second.interest_rate = dec!(0);
        let mut lines = vec![first, second];

        let outcome = apply_repayment(
            &CreditPolicy::default(),
            &mut w,
            &mut lines,
            dec!(60.00),
            today,
        )
        .unwrap();

        assert_eq!(lines[0].status, LineStatus::Paid);
        assert_eq!(lines[1].status, LineStatus::Active);
        // 10 leftover against 100 due -> fraction 0.1 -> principal paid 10
        assert_eq!(lines[1].remaining_principal, dec!(90.00));
        assert_eq!(w.credit_balance, dec!(90.00));
        assert_eq!(outcome.lines_settled, 1);
        // +10 for the settled line, +3 for the partial
        assert_eq!(w.credit_score, 613);
    }

    #[test]
    fn test_repay_rejects_invalid_amount() {
        let today = date(2026, 2, 15);
        let mut w = wallet(dec!(100), dec!(0), dec!(500));
        let mut lines = vec![open_line(&mut w, dec!(100), dec!(20), today)];
        assert_eq!(
            apply_repayment(&CreditPolicy::default(), &mut w, &mut lines, dec!(0), today),
            Err(CreditError::InvalidAmount)
        );
    }

    #[test]
    fn test_repay_rejects_insufficient_cash() {
        let today = date(2026, 2, 15);
        let mut w = wallet(dec!(100), dec!(0), dec!(500));
        let mut lines = vec![open_line(&mut w, dec!(100), dec!(20), today)];
        // cash left after down payment: 80
        assert_eq!(
            apply_repayment(
                &CreditPolicy::default(),
                &mut w,
                &mut lines,
                dec!(80.01),
                today
            ),
            Err(CreditError::InsufficientFunds)
        );
    }

    #[test]
    fn test_repay_rejects_no_active_credit() {
        let today = date(2026, 2, 15);
        let mut w = wallet(dec!(100), dec!(0), dec!(500));
        let mut lines: Vec<CreditLine> = vec![];
        assert_eq!(
            apply_repayment(
                &CreditPolicy::default(),
                &mut w,
                &mut lines,
                dec!(10),
                today
            ),
            Err(CreditError::NoActiveCredit)
        );
    }

    #[test]
    fn test_repay_overpayment_still_debits_full_amount() {
        let today = date(2026, 2, 15);
        let mut w = wallet(dec!(200), dec!(0), dec!(500));
        let mut lines = vec![open_line(&mut w, dec!(100), dec!(20), today)];

        // Owes 84.00 total; pays 100. The full 100 leaves the wallet.
        let outcome = apply_repayment(
            &CreditPolicy::default(),
            &mut w,
            &mut lines,
            dec!(100.00),
            today,
        )
        .unwrap();
        assert_eq!(outcome.amount_paid, dec!(100.00));
        assert_eq!(w.cash_balance, dec!(80.00));
        assert_eq!(w.credit_balance, dec!(0.00));
    }

    #[test]
    fn test_repay_conservation_across_lines() {
        let today = date(2026, 2, 15);
        let mut w = wallet(dec!(1000), dec!(0), dec!(1000));
        let mut lines = vec![
            open_line(&mut w, dec!(100), dec!(20), today),
            open_line(&mut w, dec!(250), dec!(50), today),
            open_line(&mut w, dec!(62.50), dec!(12.50), today),
        ];

        apply_repayment(
            &CreditPolicy::default(),
            &mut w,
            &mut lines,
            dec!(120.00),
            today,
        )
        .unwrap();

        let open_sum: Decimal = lines
            .iter()
            .filter(|l| l.status != LineStatus::Paid)
            .map(|l| l.remaining_principal)
            .sum();
        assert_eq!(w.credit_balance, open_sum);
    }
}
