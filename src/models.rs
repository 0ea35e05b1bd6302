// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{BudgetError, CategoryError};

pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "Food",
    "Transportation",
    "Entertainment",
    "Groceries",
    "Miscellaneous",
];

pub const MAX_CATEGORY_LEN: usize = 30;

pub const DEFAULT_CURRENCY: &str = "₹";

/// Calendar date as the user entered it. Kept verbatim so a malformed value
/// read back from the store is preserved; see [`EntryDate::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryDate(String);

impl EntryDate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `None` when the stored text is not a `YYYY-MM-DD` date.
    pub fn parse(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.0.trim(), "%Y-%m-%d").ok()
    }
}

impl From<NaiveDate> for EntryDate {
    fn from(d: NaiveDate) -> Self {
        Self(d.format("%Y-%m-%d").to_string())
    }
}

impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Card,
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            other => Err(format!("Unknown payment method '{}' (use Cash|Card|UPI)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Income => "Income",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionKind::Expense),
            "income" => Ok(TransactionKind::Income),
            other => Err(format!("Unknown transaction type '{}' (use expense|income)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// `0` until [`UserProfile::assign_missing_ids`] runs on a record whose
    /// stored id was not numeric.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: EntryDate,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_payment_method")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: EntryDate,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
}

/// Merged view over both ledgers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transaction {
    Expense(Expense),
    Income(Income),
}

impl Transaction {
    pub fn id(&self) -> u64 {
        match self {
            Transaction::Expense(e) => e.id,
            Transaction::Income(i) => i.id,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::Expense(_) => TransactionKind::Expense,
            Transaction::Income(_) => TransactionKind::Income,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Transaction::Expense(e) => &e.description,
            Transaction::Income(i) => &i.description,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Transaction::Expense(e) => e.category.as_deref(),
            Transaction::Income(_) => None,
        }
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        match self {
            Transaction::Expense(e) => e.payment_method,
            Transaction::Income(_) => None,
        }
    }
}

/// Anything with an amount and a date can be aggregated.
pub trait Entry {
    fn amount(&self) -> Decimal;
    fn date(&self) -> &EntryDate;
}

impl Entry for Expense {
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn date(&self) -> &EntryDate {
        &self.date
    }
}

impl Entry for Income {
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn date(&self) -> &EntryDate {
        &self.date
    }
}

impl Entry for Transaction {
    fn amount(&self) -> Decimal {
        match self {
            Transaction::Expense(e) => e.amount,
            Transaction::Income(i) => i.amount,
        }
    }
    fn date(&self) -> &EntryDate {
        match self {
            Transaction::Expense(e) => &e.date,
            Transaction::Income(i) => &i.date,
        }
    }
}

/// Ordered, duplicate-free category names. The defaults are always present
/// and cannot be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategorySet(Vec<String>);

impl Default for CategorySet {
    fn default() -> Self {
        Self(DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect())
    }
}

impl CategorySet {
    /// Drops duplicates and restores any missing default at the front.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !out.contains(&name) {
                out.push(name);
            }
        }
        let missing: Vec<String> = DEFAULT_CATEGORIES
            .iter()
            .filter(|d| !out.iter().any(|n| n == *d))
            .map(|d| d.to_string())
            .collect();
        if missing.is_empty() {
            return Self(out);
        }
        let mut merged = missing;
        merged.extend(out);
        Self(merged)
    }

    pub fn is_default(name: &str) -> bool {
        DEFAULT_CATEGORIES.contains(&name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the trimmed name that was appended.
    pub fn add(&mut self, name: &str) -> Result<String, CategoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::Empty);
        }
        if name.chars().count() > MAX_CATEGORY_LEN {
            return Err(CategoryError::TooLong(MAX_CATEGORY_LEN));
        }
        if self.contains(name) {
            return Err(CategoryError::Duplicate(name.to_string()));
        }
        self.0.push(name.to_string());
        Ok(name.to_string())
    }

    pub fn remove(&mut self, name: &str) -> Result<(), CategoryError> {
        if Self::is_default(name) {
            return Err(CategoryError::Protected(name.to_string()));
        }
        let before = self.0.len();
        self.0.retain(|n| n != name);
        if self.0.len() == before {
            return Err(CategoryError::NotFound(name.to_string()));
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for CategorySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(CategorySet::from_names(names))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
}

impl BudgetPeriod {
    pub fn days(&self) -> i64 {
        match self {
            BudgetPeriod::Weekly => 7,
            BudgetPeriod::Monthly => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
        }
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(BudgetPeriod::Weekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            other => Err(format!("Unknown budget period '{}' (use weekly|monthly)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BudgetSettings {
    #[serde(rename = "overall")]
    Overall { period: BudgetPeriod, amount: Decimal },
    #[serde(rename = "category", rename_all = "camelCase")]
    PerCategory {
        period: BudgetPeriod,
        category_budgets: BTreeMap<String, Decimal>,
    },
}

impl BudgetSettings {
    pub fn overall(period: BudgetPeriod, amount: Decimal) -> Result<Self, BudgetError> {
        if amount <= Decimal::ZERO {
            return Err(BudgetError::NonPositiveAmount(amount));
        }
        Ok(BudgetSettings::Overall { period, amount })
    }

    /// Non-positive limits are dropped; at least one must remain.
    pub fn per_category<I>(period: BudgetPeriod, limits: I) -> Result<Self, BudgetError>
    where
        I: IntoIterator<Item = (String, Decimal)>,
    {
        let category_budgets: BTreeMap<String, Decimal> = limits
            .into_iter()
            .filter(|(_, amt)| *amt > Decimal::ZERO)
            .collect();
        if category_budgets.is_empty() {
            return Err(BudgetError::NoCategoryLimits);
        }
        Ok(BudgetSettings::PerCategory {
            period,
            category_budgets,
        })
    }

    pub fn period(&self) -> BudgetPeriod {
        match self {
            BudgetSettings::Overall { period, .. } => *period,
            BudgetSettings::PerCategory { period, .. } => *period,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub currency: String,
    #[serde(default)]
    pub is_setup_complete: bool,
    #[serde(default)]
    pub categories: CategorySet,
    #[serde(default, deserialize_with = "lenient_records")]
    pub expenses: Vec<Expense>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub income: Vec<Income>,
    #[serde(default)]
    pub budget_settings: Option<BudgetSettings>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            currency: currency.into(),
            is_setup_complete: true,
            categories: CategorySet::default(),
            expenses: Vec::new(),
            income: Vec::new(),
            budget_settings: None,
        }
    }

    pub fn next_id(&self) -> u64 {
        let max_expense = self.expenses.iter().map(|e| e.id).max().unwrap_or(0);
        let max_income = self.income.iter().map(|i| i.id).max().unwrap_or(0);
        max_expense.max(max_income).saturating_add(1)
    }

    /// Gives every record stored without a usable id (read back as `0`) a
    /// fresh one. Returns how many were assigned.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut next = self.next_id();
        let mut assigned = 0;
        let ids = self
            .expenses
            .iter_mut()
            .map(|e| &mut e.id)
            .chain(self.income.iter_mut().map(|i| &mut i.id));
        for id in ids.filter(|id| **id == 0) {
            *id = next;
            next = next.saturating_add(1);
            assigned += 1;
        }
        assigned
    }

    pub fn transaction_count(&self) -> usize {
        self.expenses.len() + self.income.len()
    }
}

/// Missing, null, or non-numeric amounts read back as zero.
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    let amount = match raw {
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        serde_json::Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    Ok(amount.unwrap_or(Decimal::ZERO))
}

fn lenient_payment_method<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PaymentMethod>, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw.as_str().and_then(|s| s.parse::<PaymentMethod>().ok()))
}

/// Numbers and numeric strings; anything else reads back as `0`.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    let id = match raw {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(id.unwrap_or(0))
}

/// Non-string dates read back as empty, which never parses.
fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EntryDate, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => EntryDate(s),
        _ => EntryDate::default(),
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    })
}

/// A record that is not an object is dropped; the rest of the list survives.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Skipping unreadable stored record: {}", err);
                None
            }
        })
        .collect())
}
