// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rejections raised at the input boundary. The aggregation engine itself
//! never fails; these only come from validating user input before it is
//! applied to the profile.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::TransactionKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Please enter a category name")]
    Empty,
    #[error("Category name must be {0} characters or less")]
    TooLong(usize),
    #[error("Category '{0}' already exists")]
    Duplicate(String),
    #[error("Cannot delete default category '{0}'")]
    Protected(String),
    #[error("Category '{0}' not found")]
    NotFound(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    #[error("Budget amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Please set at least one category budget")]
    NoCategoryLimits,
    #[error("Budget references unknown category '{0}'")]
    UnknownCategory(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Setup has not been completed")]
    NotSetUp,
    #[error("Please enter your name")]
    EmptyName,
    #[error("Please enter a valid amount, got {0}")]
    InvalidAmount(Decimal),
    #[error("Please enter a description")]
    EmptyDescription,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
    #[error("No {} with id {}", .kind.as_str(), .id)]
    TransactionNotFound { id: u64, kind: TransactionKind },
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Budget(#[from] BudgetError),
}
