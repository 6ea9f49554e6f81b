// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tallybook::engine::budget::{BudgetInputs, BudgetPolicy, BudgetReport};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn inputs() -> BudgetInputs {
    BudgetInputs {
        planned_income: Some(dec!(200000)),
        income_month: dec!(150000),
        expense_month: dec!(40000),
        flat_tax_reserve_month: dec!(9000),
        loan_obligations: dec!(15000),
        tax_monthly_reserve: dec!(6000),
        target_monthly: dec!(30000),
        saved_this_month: dec!(10000),
        carry_in: dec!(5000),
        savings_mirrored: true,
    }
}

#[test]
fn forecast_from_planned_income() {
    // June has 30 days; 21 remain counting the 10th
    let r = BudgetReport::compute(BudgetPolicy::Forecast, &inputs(), d("2025-06-10"));
    assert_eq!(r.base_income, dec!(200000));
    assert_eq!(r.spendable_before_saving, dec!(170000));
    assert_eq!(r.allowed_monthly_spend, dec!(140000));
    assert_eq!(r.average_daily_limit.round_dp(2), dec!(4666.67));
    assert_eq!(r.remaining_allowed_spend, dec!(100000));
    assert_eq!(r.days_in_month, 30);
    assert_eq!(r.days_remaining, 21);
    assert_eq!(r.daily_limit_from_today.round_dp(2), dec!(4761.90));
    assert_eq!(r.free_now, dec!(110000));
    assert_eq!(r.free_forecast, dec!(70000));
}

#[test]
fn forecast_falls_back_to_actual_income() {
    for planned in [None, Some(Decimal::ZERO)] {
        let i = BudgetInputs {
            planned_income: planned,
            ..inputs()
        };
        let r = BudgetReport::compute(BudgetPolicy::Forecast, &i, d("2025-06-10"));
        assert_eq!(r.base_income, dec!(150000));
        assert_eq!(r.allowed_monthly_spend, dec!(90000));
    }
}

#[test]
fn overspending_goes_negative_but_reserves_floor_at_zero() {
    let over = BudgetInputs {
        expense_month: dec!(150000),
        ..inputs()
    };
    let r = BudgetReport::compute(BudgetPolicy::Forecast, &over, d("2025-06-10"));
    assert_eq!(r.remaining_allowed_spend, dec!(-10000));
    assert!(r.daily_limit_from_today < Decimal::ZERO);

    let thin = BudgetInputs {
        planned_income: Some(dec!(10000)),
        ..inputs()
    };
    let r = BudgetReport::compute(BudgetPolicy::Forecast, &thin, d("2025-06-10"));
    assert_eq!(r.spendable_before_saving, Decimal::ZERO);
    assert_eq!(r.allowed_monthly_spend, Decimal::ZERO);
    assert_eq!(r.average_daily_limit, Decimal::ZERO);
}

#[test]
fn cash_position_counts_carry_in() {
    let r = BudgetReport::compute(BudgetPolicy::CashPosition, &inputs(), d("2025-06-10"));
    assert_eq!(r.cash_on_hand, dec!(115000));
    assert_eq!(r.allowed_monthly_spend, dec!(115000));
    // 20 000 of the savings target is still owed
    assert_eq!(r.remaining_allowed_spend, dec!(95000));
    assert_eq!(r.daily_limit_from_today.round_dp(2), dec!(4523.81));
    assert_eq!(r.free_forecast, dec!(70000));
}

#[test]
fn cash_position_subtracts_unmirrored_savings() {
    let i = BudgetInputs {
        savings_mirrored: false,
        ..inputs()
    };
    let r = BudgetReport::compute(BudgetPolicy::CashPosition, &i, d("2025-06-10"));
    assert_eq!(r.cash_on_hand, dec!(105000));
    assert_eq!(r.remaining_allowed_spend, dec!(85000));
}

#[test]
fn last_day_of_month_divides_by_one() {
    let r = BudgetReport::compute(BudgetPolicy::Forecast, &inputs(), d("2025-06-30"));
    assert_eq!(r.days_remaining, 1);
    assert_eq!(r.daily_limit_from_today, r.remaining_allowed_spend);
}

#[test]
fn policy_names() {
    assert_eq!(BudgetPolicy::parse("Forecast").unwrap(), BudgetPolicy::Forecast);
    assert_eq!(BudgetPolicy::parse("cash").unwrap(), BudgetPolicy::CashPosition);
    assert_eq!(BudgetPolicy::CashPosition.to_string(), "cash");
    assert!(BudgetPolicy::parse("envelope").is_err());
}
