// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{dispatch, load_profile};
use crate::models::CategorySet;
use crate::state::Action;
use crate::utils::{pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?.trim().to_string();
            dispatch(conn, Action::AddCategory(name.clone()))?;
            println!("Added category '{}'", name);
        }
        Some(("list", _)) => {
            let profile = load_profile(conn)?;
            let data = list_rows(&profile.categories);
            println!("{}", pretty_table(&["Category", "Kind"], data));
        }
        Some(("rm", sub)) => {
            let name = required(sub, "name")?.trim().to_string();
            dispatch(conn, Action::DeleteCategory(name.clone()))?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

pub fn list_rows(categories: &CategorySet) -> Vec<Vec<String>> {
    categories
        .iter()
        .map(|c| {
            let kind = if CategorySet::is_default(c) {
                "default"
            } else {
                "custom"
            };
            vec![c.to_string(), kind.to_string()]
        })
        .collect()
}
