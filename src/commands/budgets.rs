// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{dispatch, load_profile, today};
use crate::engine::{BudgetStatus, evaluate_budget, format_currency};
use crate::models::{BudgetPeriod, BudgetSettings};
use crate::state::Action;
use crate::utils::{maybe_print_json, parse_decimal, parse_limit, pretty_table, required};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-overall", sub)) => set_overall(conn, sub)?,
        Some(("set-category", sub)) => set_category(conn, sub)?,
        Some(("show", _)) => show(conn)?,
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn period(sub: &clap::ArgMatches) -> Result<BudgetPeriod> {
    required(sub, "period")?
        .parse::<BudgetPeriod>()
        .map_err(|e| anyhow!(e))
}

fn set_overall(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = period(sub)?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let settings = BudgetSettings::overall(period, amount)?;
    dispatch(conn, Action::SaveBudget(settings))?;
    println!("Overall {} budget set to {}", period.as_str(), amount);
    Ok(())
}

fn set_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = period(sub)?;
    let limits = sub
        .get_many::<String>("limit")
        .into_iter()
        .flatten()
        .map(|s| parse_limit(s))
        .collect::<Result<Vec<_>>>()?;
    let settings = BudgetSettings::per_category(period, limits)?;
    dispatch(conn, Action::SaveBudget(settings))?;
    println!("Category {} budgets saved", period.as_str());
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let profile = load_profile(conn)?;
    match &profile.budget_settings {
        None => println!("No budget set"),
        Some(BudgetSettings::Overall { period, amount }) => {
            let data = vec![vec![
                "(overall)".to_string(),
                period.as_str().to_string(),
                format_currency(*amount, &profile.currency),
            ]];
            println!("{}", pretty_table(&["Scope", "Period", "Limit"], data));
        }
        Some(BudgetSettings::PerCategory {
            period,
            category_budgets,
        }) => {
            let data = category_budgets
                .iter()
                .map(|(cat, amt)| {
                    vec![
                        cat.clone(),
                        period.as_str().to_string(),
                        format_currency(*amt, &profile.currency),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["Scope", "Period", "Limit"], data));
        }
    }
    Ok(())
}

#[derive(Serialize)]
pub struct StatusReport {
    pub exceeded: bool,
    pub message: String,
    #[serde(flatten)]
    pub status: BudgetStatus,
}

pub fn status_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<StatusReport> {
    let profile = load_profile(conn)?;
    let status = evaluate_budget(
        profile.budget_settings.as_ref(),
        &profile.expenses,
        today(sub)?,
    );
    Ok(StatusReport {
        exceeded: status.exceeded(),
        message: status.message(),
        status,
    })
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let report = status_report(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }
    let currency = load_profile(conn)?.currency;
    println!("{}", report.message);
    if let BudgetStatus::Overall {
        period,
        limit,
        spent,
        remaining,
    } = &report.status
    {
        let data = vec![vec![
            period.as_str().to_string(),
            format_currency(*limit, &currency),
            format_currency(*spent, &currency),
            format_currency(*remaining, &currency),
        ]];
        println!(
            "{}",
            pretty_table(&["Period", "Limit", "Spent", "Remaining"], data)
        );
    }
    let flagged = report.status.flagged();
    if !flagged.is_empty() {
        let data = flagged
            .iter()
            .map(|f| {
                vec![
                    f.category.clone(),
                    format_currency(f.limit, &currency),
                    format_currency(f.spent, &currency),
                    format_currency(f.overage, &currency),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Limit", "Spent", "Exceeded by"], data)
        );
    }
    Ok(())
}
