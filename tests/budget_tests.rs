// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use spendlog::engine::{BudgetStatus, evaluate_budget, period_total};
use spendlog::error::BudgetError;
use spendlog::models::{BudgetPeriod, BudgetSettings, EntryDate, Expense, PaymentMethod};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn spend(id: u64, date: &str, amount: Decimal, category: &str) -> Expense {
    Expense {
        id,
        date: EntryDate::new(date),
        amount,
        description: "spend".into(),
        category: Some(category.to_string()),
        payment_method: Some(PaymentMethod::Card),
        notes: None,
    }
}

#[test]
fn no_settings_is_never_exceeded() {
    let expenses = vec![spend(1, "2024-01-10", dec!(1000), "Food")];
    let status = evaluate_budget(None, &expenses, d("2024-01-15"));
    assert_eq!(status, BudgetStatus::NotSet);
    assert!(!status.exceeded());
    assert_eq!(status.remaining(), None);
    assert_eq!(status.message(), "No budget set");
}

#[test]
fn overall_monthly_budget_exceeded() {
    let expenses = vec![spend(1, "2024-01-01", dec!(50), "Food")];
    let settings = BudgetSettings::overall(BudgetPeriod::Monthly, dec!(40)).unwrap();
    let status = evaluate_budget(Some(&settings), &expenses, d("2024-01-15"));
    assert!(status.exceeded());
    assert_eq!(status.overage(), Some(dec!(10)));
    assert_eq!(status.remaining(), None);
    assert_eq!(status.message(), "Budget exceeded by 10.00!");
}

#[test]
fn overall_budget_reports_remaining() {
    let expenses = vec![
        spend(1, "2024-01-14", dec!(12.5), "Food"),
        // outside the weekly window
        spend(2, "2024-01-01", dec!(500), "Food"),
        // future-dated entries are not counted
        spend(3, "2024-01-20", dec!(500), "Food"),
    ];
    let settings = BudgetSettings::overall(BudgetPeriod::Weekly, dec!(100)).unwrap();
    let status = evaluate_budget(Some(&settings), &expenses, d("2024-01-15"));
    assert!(!status.exceeded());
    assert_eq!(status.remaining(), Some(dec!(87.5)));
    assert_eq!(status.message(), "87.50 remaining in your weekly budget");
}

#[test]
fn spending_exactly_the_limit_is_not_exceeded() {
    let expenses = vec![spend(1, "2024-01-15", dec!(40), "Food")];
    let settings = BudgetSettings::overall(BudgetPeriod::Monthly, dec!(40)).unwrap();
    let status = evaluate_budget(Some(&settings), &expenses, d("2024-01-15"));
    assert!(!status.exceeded());
    assert_eq!(status.remaining(), Some(Decimal::ZERO));
}

#[test]
fn per_category_budget_flags_overspent_category() {
    let expenses = vec![
        spend(1, "2024-01-10", dec!(20), "Food"),
        spend(2, "2024-01-12", dec!(15), "Food"),
        spend(3, "2024-01-12", dec!(999), "Entertainment"),
    ];
    let settings = BudgetSettings::per_category(
        BudgetPeriod::Monthly,
        vec![("Food".to_string(), dec!(30))],
    )
    .unwrap();
    let status = evaluate_budget(Some(&settings), &expenses, d("2024-01-15"));
    assert!(status.exceeded());
    let flagged = status.flagged();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].category, "Food");
    assert_eq!(flagged[0].spent, dec!(35));
    assert_eq!(flagged[0].limit, dec!(30));
    assert_eq!(flagged[0].overage, dec!(5));
    assert_eq!(status.message(), "Budget exceeded in 1 category(ies)!");
}

#[test]
fn per_category_within_limits() {
    let expenses = vec![
        spend(1, "2024-01-10", dec!(20), "Food"),
        spend(2, "2023-11-01", dec!(200), "Groceries"),
    ];
    let settings = BudgetSettings::per_category(
        BudgetPeriod::Monthly,
        vec![
            ("Food".to_string(), dec!(30)),
            ("Groceries".to_string(), dec!(50)),
        ],
    )
    .unwrap();
    let status = evaluate_budget(Some(&settings), &expenses, d("2024-01-15"));
    assert!(!status.exceeded());
    assert!(status.flagged().is_empty());
    assert_eq!(status.message(), "All category budgets are within limits");
}

#[test]
fn per_category_drops_non_positive_limits() {
    let settings = BudgetSettings::per_category(
        BudgetPeriod::Weekly,
        vec![
            ("Food".to_string(), dec!(0)),
            ("Groceries".to_string(), dec!(25)),
        ],
    )
    .unwrap();
    match settings {
        BudgetSettings::PerCategory {
            category_budgets, ..
        } => {
            assert_eq!(category_budgets.len(), 1);
            assert_eq!(category_budgets.get("Groceries"), Some(&dec!(25)));
        }
        other => panic!("unexpected settings {:?}", other),
    }

    let err = BudgetSettings::per_category(
        BudgetPeriod::Weekly,
        vec![("Food".to_string(), dec!(-1))],
    )
    .unwrap_err();
    assert_eq!(err, BudgetError::NoCategoryLimits);
    assert!(BudgetSettings::overall(BudgetPeriod::Weekly, dec!(0)).is_err());
}

#[test]
fn period_totals_match_dashboard_windows() {
    let expenses = vec![
        spend(1, "2024-01-15", dec!(1), "Food"),
        spend(2, "2024-01-08", dec!(2), "Food"),
        spend(3, "2024-01-07", dec!(4), "Food"),
        spend(4, "2023-12-16", dec!(8), "Food"),
        spend(5, "2023-12-15", dec!(16), "Food"),
    ];
    let today = d("2024-01-15");
    assert_eq!(period_total(&expenses, BudgetPeriod::Weekly, today), dec!(3));
    assert_eq!(period_total(&expenses, BudgetPeriod::Monthly, today), dec!(15));
}

#[test]
fn budget_settings_keep_their_stored_shape() {
    let overall = BudgetSettings::overall(BudgetPeriod::Monthly, dec!(500)).unwrap();
    let v = serde_json::to_value(&overall).unwrap();
    assert_eq!(v["type"], "overall");
    assert_eq!(v["period"], "monthly");

    let raw = r#"{"type":"category","period":"weekly","categoryBudgets":{"Food":30,"Groceries":"12.5"}}"#;
    let parsed: BudgetSettings = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.period(), BudgetPeriod::Weekly);
    match parsed {
        BudgetSettings::PerCategory {
            category_budgets, ..
        } => assert_eq!(category_budgets.get("Groceries"), Some(&dec!(12.5))),
        other => panic!("unexpected settings {:?}", other),
    }
}
