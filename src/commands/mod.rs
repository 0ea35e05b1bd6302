// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod setup;
pub mod categories;
pub mod transactions;
pub mod budgets;
pub mod reports;
pub mod exporter;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db;
use crate::models::UserProfile;
use crate::state::{Action, AppState, reduce};
use crate::utils::parse_date;

/// Reference date for period windows: `--as-of` when given, else today.
pub fn today(m: &clap::ArgMatches) -> Result<NaiveDate> {
    match m.try_get_one::<String>("as_of").ok().flatten() {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub fn load_state(conn: &Connection) -> AppState {
    AppState::from_profile(db::load_profile(conn))
}

pub fn load_profile(conn: &Connection) -> Result<UserProfile> {
    let state = load_state(conn);
    let profile = state
        .profile()
        .context("No profile found; run `spendlog setup --name <NAME>` first")?;
    Ok(profile.clone())
}

/// Loads the stored record, applies one action, and saves the result.
pub fn dispatch(conn: &Connection, action: Action) -> Result<AppState> {
    let state = load_state(conn);
    let next = reduce(state, action)?;
    if let Some(profile) = &next.profile {
        db::save_profile(conn, profile)?;
    }
    Ok(next)
}
