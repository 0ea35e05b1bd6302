// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use crate::engine::{
    self, BudgetStatus, DailyTotal, GroupTotal, expenses_by_category, expenses_by_payment_method,
    percentage_of, round_percentage,
};
use crate::models::{BudgetPeriod, Expense, Transaction, UserProfile};

pub const RECENT_COUNT: usize = 5;
pub const TREND_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub name: String,
    pub currency: String,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_balance: Decimal,
    pub weekly_expenses: Decimal,
    pub monthly_expenses: Decimal,
    pub recent: Vec<Transaction>,
    pub budget: BudgetStatus,
}

impl DashboardSummary {
    pub fn build(profile: &UserProfile, today: NaiveDate) -> Self {
        Self {
            name: profile.name.clone(),
            currency: profile.currency.clone(),
            total_income: engine::sum(&profile.income),
            total_expenses: engine::sum(&profile.expenses),
            net_balance: engine::net_balance(&profile.income, &profile.expenses),
            weekly_expenses: engine::period_total(&profile.expenses, BudgetPeriod::Weekly, today),
            monthly_expenses: engine::period_total(&profile.expenses, BudgetPeriod::Monthly, today),
            recent: engine::recent_transactions(&profile.expenses, &profile.income, RECENT_COUNT),
            budget: engine::evaluate_budget(
                profile.budget_settings.as_ref(),
                &profile.expenses,
                today,
            ),
        }
    }

    /// Only an exceeded budget raises an alert on the dashboard.
    pub fn budget_alert(&self) -> Option<&BudgetStatus> {
        self.budget.exceeded().then_some(&self.budget)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsWindow {
    AllTime,
    Last30Days,
    Last7Days,
}

impl AnalyticsWindow {
    fn days(&self) -> Option<i64> {
        match self {
            AnalyticsWindow::AllTime => None,
            AnalyticsWindow::Last30Days => Some(BudgetPeriod::Monthly.days()),
            AnalyticsWindow::Last7Days => Some(BudgetPeriod::Weekly.days()),
        }
    }

    /// The analytics view has no upper bound, so future-dated entries count.
    pub fn select<'a>(&self, expenses: &'a [Expense], today: NaiveDate) -> Vec<&'a Expense> {
        match self.days() {
            None => expenses.iter().collect(),
            Some(days) => engine::within_last_n_days(expenses, today, days, None),
        }
    }
}

impl FromStr for AnalyticsWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(AnalyticsWindow::AllTime),
            "monthly" | "30d" => Ok(AnalyticsWindow::Last30Days),
            "weekly" | "7d" => Ok(AnalyticsWindow::Last7Days),
            other => Err(format!("Unknown period '{}' (use all|monthly|weekly)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub key: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

fn breakdown(groups: Vec<GroupTotal>, total: Decimal) -> Vec<BreakdownRow> {
    let n = groups.len();
    engine::top_n(&groups, n)
        .into_iter()
        .map(|g| BreakdownRow {
            percentage: round_percentage(percentage_of(g.amount, total)),
            key: g.key,
            amount: g.amount,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub window: AnalyticsWindow,
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub net_balance: Decimal,
    pub expense_count: usize,
    pub by_category: Vec<BreakdownRow>,
    pub by_payment_method: Vec<BreakdownRow>,
    pub trend: Vec<DailyTotal>,
}

impl AnalyticsReport {
    pub fn build(profile: &UserProfile, window: AnalyticsWindow, today: NaiveDate) -> Self {
        let selected = window.select(&profile.expenses, today);
        let total_expenses = engine::sum(selected.iter().copied());
        // income is never windowed here
        let total_income = engine::sum(&profile.income);
        Self {
            window,
            total_expenses,
            total_income,
            net_balance: total_income.saturating_sub(total_expenses),
            expense_count: selected.len(),
            by_category: breakdown(
                expenses_by_category(selected.iter().copied()),
                total_expenses,
            ),
            by_payment_method: breakdown(
                expenses_by_payment_method(selected.iter().copied()),
                total_expenses,
            ),
            trend: engine::spending_trend(&profile.expenses, today, TREND_DAYS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub total_transactions: usize,
    pub expense_count: usize,
    pub income_count: usize,
    pub expense_amount: Decimal,
    pub income_amount: Decimal,
    pub net_balance: Decimal,
}

impl ExportSummary {
    pub fn build(profile: &UserProfile) -> Self {
        Self {
            total_transactions: profile.transaction_count(),
            expense_count: profile.expenses.len(),
            income_count: profile.income.len(),
            expense_amount: engine::sum(&profile.expenses),
            income_amount: engine::sum(&profile.income),
            net_balance: engine::net_balance(&profile.income, &profile.expenses),
        }
    }
}
