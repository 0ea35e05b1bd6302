// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregation engine: stateless reductions over transaction slices.
//!
//! Nothing here performs I/O or returns an error. Amounts that were malformed
//! on disk already read back as zero (see `models`), and records whose date
//! does not parse are left out of every date-bounded view.

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::debug;

use crate::models::{
    BudgetPeriod, BudgetSettings, Entry, Expense, Income, PaymentMethod, Transaction,
    TransactionKind,
};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const UNKNOWN_METHOD: &str = "Unknown";

fn range_floor() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn range_ceiling() -> NaiveDate {
    NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub amount: Decimal,
}

/// Totals saturate at the `Decimal` bounds instead of overflowing.
pub fn sum<'a, T, I>(items: I) -> Decimal
where
    T: Entry + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount()))
}

/// Totals per key in first-seen order. `fallback` stands in for records
/// without a key.
pub fn group_sum<'a, T, I, F>(items: I, key: F, fallback: &str) -> Vec<GroupTotal>
where
    T: Entry + 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&'a T) -> Option<&'a str>,
{
    let mut groups: Vec<GroupTotal> = Vec::new();
    for item in items {
        let k = key(item).unwrap_or(fallback);
        match groups.iter_mut().find(|g| g.key == k) {
            Some(g) => g.amount = g.amount.saturating_add(item.amount()),
            None => groups.push(GroupTotal {
                key: k.to_string(),
                amount: item.amount(),
            }),
        }
    }
    groups
}

pub fn expenses_by_category<'a, I>(expenses: I) -> Vec<GroupTotal>
where
    I: IntoIterator<Item = &'a Expense>,
{
    group_sum(expenses, |e: &'a Expense| e.category.as_deref(), UNCATEGORIZED)
}

pub fn expenses_by_payment_method<'a, I>(expenses: I) -> Vec<GroupTotal>
where
    I: IntoIterator<Item = &'a Expense>,
{
    group_sum(
        expenses,
        |e: &'a Expense| e.payment_method.map(|m| m.as_str()),
        UNKNOWN_METHOD,
    )
}

pub fn net_balance(income: &[Income], expenses: &[Expense]) -> Decimal {
    sum(income).saturating_sub(sum(expenses))
}

/// Records dated on or after `reference - days`, and on or before `end` when
/// one is given.
pub fn within_last_n_days<T: Entry>(
    items: &[T],
    reference: NaiveDate,
    days: i64,
    end: Option<NaiveDate>,
) -> Vec<&T> {
    let start = reference
        .checked_sub_days(Days::new(days.max(0) as u64))
        .unwrap_or(NaiveDate::MIN);
    items
        .iter()
        .filter(|t| in_bounds(*t, start, end.unwrap_or(NaiveDate::MAX)))
        .collect()
}

/// Inclusive on both ends. With neither bound every record is returned,
/// including ones with unreadable dates.
pub fn filter_by_date_range<T: Entry>(
    items: &[T],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<&T> {
    if start.is_none() && end.is_none() {
        return items.iter().collect();
    }
    let start = start.unwrap_or_else(range_floor);
    let end = end.unwrap_or_else(range_ceiling);
    items.iter().filter(|t| in_bounds(*t, start, end)).collect()
}

fn in_bounds<T: Entry>(item: &T, start: NaiveDate, end: NaiveDate) -> bool {
    match item.date().parse() {
        Some(d) => d >= start && d <= end,
        None => {
            debug!(date = %item.date(), "dropping record with unreadable date");
            false
        }
    }
}

pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

pub fn round_percentage(p: Decimal) -> Decimal {
    p.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Descending by amount; equal amounts keep their input order.
pub fn top_n(groups: &[GroupTotal], n: usize) -> Vec<GroupTotal> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| b.amount.cmp(&a.amount));
    sorted.truncate(n);
    sorted
}

/// Newest first. Records with unreadable dates sort after everything else.
pub fn sort_newest_first(items: &mut [Transaction]) {
    items.sort_by(|a, b| b.date().parse().cmp(&a.date().parse()));
}

pub fn recent_transactions(expenses: &[Expense], income: &[Income], n: usize) -> Vec<Transaction> {
    let mut all: Vec<Transaction> = merge(expenses, income);
    sort_newest_first(&mut all);
    all.truncate(n);
    all
}

pub fn merge(expenses: &[Expense], income: &[Income]) -> Vec<Transaction> {
    expenses
        .iter()
        .cloned()
        .map(Transaction::Expense)
        .chain(income.iter().cloned().map(Transaction::Income))
        .collect()
}

/// Expense total for the budget window ending `today`.
pub fn period_total(expenses: &[Expense], period: BudgetPeriod, today: NaiveDate) -> Decimal {
    sum(within_last_n_days(expenses, today, period.days(), Some(today)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOverage {
    pub category: String,
    pub spent: Decimal,
    pub limit: Decimal,
    pub overage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BudgetStatus {
    NotSet,
    Overall {
        period: BudgetPeriod,
        limit: Decimal,
        spent: Decimal,
        /// Negative once the limit is passed.
        remaining: Decimal,
    },
    PerCategory {
        period: BudgetPeriod,
        flagged: Vec<CategoryOverage>,
    },
}

impl BudgetStatus {
    pub fn exceeded(&self) -> bool {
        match self {
            BudgetStatus::NotSet => false,
            BudgetStatus::Overall { remaining, .. } => *remaining < Decimal::ZERO,
            BudgetStatus::PerCategory { flagged, .. } => !flagged.is_empty(),
        }
    }

    /// Amount left in an overall budget; `None` otherwise or once exceeded.
    pub fn remaining(&self) -> Option<Decimal> {
        match self {
            BudgetStatus::Overall { remaining, .. } if !self.exceeded() => Some(*remaining),
            _ => None,
        }
    }

    /// How far an overall budget has been overspent.
    pub fn overage(&self) -> Option<Decimal> {
        match self {
            BudgetStatus::Overall { remaining, .. } if self.exceeded() => Some(remaining.abs()),
            _ => None,
        }
    }

    pub fn flagged(&self) -> &[CategoryOverage] {
        match self {
            BudgetStatus::PerCategory { flagged, .. } => flagged,
            _ => &[],
        }
    }

    pub fn message(&self) -> String {
        match self {
            BudgetStatus::NotSet => "No budget set".to_string(),
            BudgetStatus::Overall {
                period, remaining, ..
            } => {
                if self.exceeded() {
                    format!("Budget exceeded by {}!", fixed2(remaining.abs()))
                } else {
                    format!(
                        "{} remaining in your {} budget",
                        fixed2(*remaining),
                        period.as_str()
                    )
                }
            }
            BudgetStatus::PerCategory { flagged, .. } => {
                if flagged.is_empty() {
                    "All category budgets are within limits".to_string()
                } else {
                    format!("Budget exceeded in {} category(ies)!", flagged.len())
                }
            }
        }
    }
}

/// Recomputed from the full history on every call.
pub fn evaluate_budget(
    settings: Option<&BudgetSettings>,
    expenses: &[Expense],
    now: NaiveDate,
) -> BudgetStatus {
    let Some(settings) = settings else {
        return BudgetStatus::NotSet;
    };
    let period = settings.period();
    let window = within_last_n_days(expenses, now, period.days(), Some(now));
    match settings {
        BudgetSettings::Overall { amount, .. } => {
            let spent = sum(window);
            BudgetStatus::Overall {
                period,
                limit: *amount,
                spent,
                remaining: amount.saturating_sub(spent),
            }
        }
        BudgetSettings::PerCategory {
            category_budgets, ..
        } => {
            let by_category = expenses_by_category(window);
            let flagged = category_budgets
                .iter()
                .filter_map(|(category, limit)| {
                    let spent = by_category
                        .iter()
                        .find(|g| &g.key == category)
                        .map(|g| g.amount)
                        .unwrap_or(Decimal::ZERO);
                    (spent > *limit).then(|| CategoryOverage {
                        category: category.clone(),
                        spent,
                        limit: *limit,
                        overage: spent.saturating_sub(*limit),
                    })
                })
                .collect();
            BudgetStatus::PerCategory { period, flagged }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Longest trend a caller can ask for.
pub const MAX_TREND_DAYS: u64 = 366;

/// One entry per day for the `days` days ending `today`, oldest first.
/// `days` is capped at [`MAX_TREND_DAYS`].
pub fn spending_trend(expenses: &[Expense], today: NaiveDate, days: u64) -> Vec<DailyTotal> {
    (0..days.min(MAX_TREND_DAYS))
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| DailyTotal {
            date,
            amount: sum(expenses.iter().filter(|e| e.date.parse() == Some(date))),
        })
        .collect()
}

/// Filters applied by the transaction list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub search: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl TransactionQuery {
    fn matches(&self, t: &Transaction) -> bool {
        if self.kind.is_some_and(|k| k != t.kind()) {
            return false;
        }
        if let Some(cat) = &self.category {
            if t.category() != Some(cat.as_str()) {
                return false;
            }
        }
        if let Some(method) = self.payment_method {
            if t.payment_method() != Some(method) {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !term.is_empty() && !t.description().to_lowercase().contains(&term) {
                return false;
            }
        }
        true
    }

    pub fn run(&self, expenses: &[Expense], income: &[Income]) -> Vec<Transaction> {
        let candidates: Vec<Transaction> = merge(expenses, income)
            .into_iter()
            .filter(|t| self.matches(t))
            .collect();
        let mut out: Vec<Transaction> = filter_by_date_range(&candidates, self.start, self.end)
            .into_iter()
            .cloned()
            .collect();
        sort_newest_first(&mut out);
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

/// Two decimal places, half away from zero.
pub fn fixed2(d: Decimal) -> String {
    format!(
        "{:.2}",
        d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    format!("{} {}", symbol, fixed2(amount))
}
