// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Application state as a value. Every mutation is an [`Action`] run through
//! [`reduce`], which consumes the current state and either returns the next
//! one or rejects the action. A caller that needs the prior state after a
//! rejection keeps its own copy; `commands::dispatch` reloads from storage,
//! which a rejection never touches.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BudgetError, StateError};
use crate::models::{
    BudgetSettings, DEFAULT_CURRENCY, EntryDate, Expense, Income, PaymentMethod, TransactionKind,
    UserProfile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Page {
    Setup,
    Welcome,
    Dashboard,
    AddExpense,
    AddIncome,
    Transactions,
    Analytics,
    BudgetSettings,
    CategoryManager,
    Export,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: EntryDate,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub date: EntryDate,
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CompleteSetup { name: String, currency: String },
    ContinueFromWelcome,
    AddExpense(NewExpense),
    AddIncome(NewIncome),
    DeleteTransaction { id: u64, kind: TransactionKind },
    AddCategory(String),
    DeleteCategory(String),
    SaveBudget(BudgetSettings),
    Navigate(Page),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub page: Page,
    pub profile: Option<UserProfile>,
}

impl AppState {
    pub fn from_profile(profile: Option<UserProfile>) -> Self {
        match profile {
            Some(p) if p.is_setup_complete => Self {
                page: Page::Welcome,
                profile: Some(p),
            },
            _ => Self {
                page: Page::Setup,
                profile: None,
            },
        }
    }

    pub fn profile(&self) -> Result<&UserProfile, StateError> {
        self.profile.as_ref().ok_or(StateError::NotSetUp)
    }
}

fn validate_entry(date: &EntryDate, amount: Decimal, description: &str) -> Result<(), StateError> {
    if amount <= Decimal::ZERO {
        return Err(StateError::InvalidAmount(amount));
    }
    if description.trim().is_empty() {
        return Err(StateError::EmptyDescription);
    }
    if date.parse().is_none() {
        return Err(StateError::InvalidDate(date.to_string()));
    }
    Ok(())
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

pub fn reduce(state: AppState, action: Action) -> Result<AppState, StateError> {
    let AppState { page, profile } = state;
    debug!(?page, action = action_name(&action), "reduce");

    let action = match action {
        Action::CompleteSetup { name, currency } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(StateError::EmptyName);
            }
            let currency = match currency.trim() {
                "" => DEFAULT_CURRENCY,
                c => c,
            };
            return Ok(AppState {
                page: Page::Welcome,
                profile: Some(UserProfile::new(name, currency)),
            });
        }
        Action::Navigate(next) => {
            return Ok(AppState {
                page: next,
                profile,
            });
        }
        other => other,
    };

    let mut profile = profile.ok_or(StateError::NotSetUp)?;
    let next_page = match action {
        Action::ContinueFromWelcome => Page::Dashboard,
        Action::AddExpense(new) => {
            validate_entry(&new.date, new.amount, &new.description)?;
            if !profile.categories.contains(&new.category) {
                return Err(StateError::UnknownCategory(new.category));
            }
            let id = profile.next_id();
            profile.expenses.push(Expense {
                id,
                date: new.date,
                amount: new.amount,
                description: new.description.trim().to_string(),
                category: Some(new.category),
                payment_method: Some(new.payment_method),
                notes: clean_notes(new.notes),
            });
            Page::Dashboard
        }
        Action::AddIncome(new) => {
            validate_entry(&new.date, new.amount, &new.description)?;
            let id = profile.next_id();
            profile.income.push(Income {
                id,
                date: new.date,
                amount: new.amount,
                description: new.description.trim().to_string(),
            });
            Page::Dashboard
        }
        Action::DeleteTransaction { id, kind } => {
            let removed = match kind {
                TransactionKind::Expense => remove_by_id(&mut profile.expenses, |e| e.id == id),
                TransactionKind::Income => remove_by_id(&mut profile.income, |i| i.id == id),
            };
            if !removed {
                return Err(StateError::TransactionNotFound { id, kind });
            }
            page
        }
        Action::AddCategory(name) => {
            profile.categories.add(&name)?;
            page
        }
        Action::DeleteCategory(name) => {
            profile.categories.remove(&name)?;
            page
        }
        Action::SaveBudget(settings) => {
            if let BudgetSettings::PerCategory {
                category_budgets, ..
            } = &settings
            {
                if let Some(unknown) = category_budgets
                    .keys()
                    .find(|c| !profile.categories.contains(c))
                {
                    return Err(BudgetError::UnknownCategory(unknown.clone()).into());
                }
            }
            profile.budget_settings = Some(settings);
            Page::Dashboard
        }
        Action::CompleteSetup { .. } | Action::Navigate(_) => page,
    };

    Ok(AppState {
        page: next_page,
        profile: Some(profile),
    })
}

fn remove_by_id<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|t| !pred(t));
    items.len() != before
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::CompleteSetup { .. } => "complete_setup",
        Action::ContinueFromWelcome => "continue_from_welcome",
        Action::AddExpense(_) => "add_expense",
        Action::AddIncome(_) => "add_income",
        Action::DeleteTransaction { .. } => "delete_transaction",
        Action::AddCategory(_) => "add_category",
        Action::DeleteCategory(_) => "delete_category",
        Action::SaveBudget(_) => "save_budget",
        Action::Navigate(_) => "navigate",
    }
}
