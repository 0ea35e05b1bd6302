// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::dispatch;
use crate::db;
use crate::state::Action;
use crate::utils::required;
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    if db::is_setup_complete(conn) {
        return Err(anyhow!(
            "A profile already exists; run `spendlog reset --yes` to start over"
        ));
    }
    if db::has_unreadable_data(conn) {
        return Err(anyhow!(
            "Stored data could not be read; run `spendlog reset --yes` to discard it"
        ));
    }
    let name = required(sub, "name")?.to_string();
    let currency = sub
        .get_one::<String>("currency")
        .cloned()
        .unwrap_or_default();
    let state = dispatch(conn, Action::CompleteSetup { name, currency })?;
    if let Some(p) = &state.profile {
        println!("Welcome, {}! Amounts will be shown in {}", p.name, p.currency);
    }
    Ok(())
}

pub fn reset(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    if !sub.get_flag("yes") {
        return Err(anyhow!("Refusing to delete data without --yes"));
    }
    db::clear_profile(conn)?;
    println!("All data cleared");
    Ok(())
}
