// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{AnalyticsReport, AnalyticsWindow, BreakdownRow, DashboardSummary};
use crate::commands::{load_profile, today};
use crate::engine::{format_currency, spending_trend};
use crate::models::{Entry, Transaction};
use crate::utils::{maybe_print_json, pretty_table, required};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => dashboard(conn, sub)?,
        Some(("analytics", sub)) => analytics(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn signed(t: &Transaction, currency: &str) -> String {
    let sign = match t {
        Transaction::Expense(_) => "-",
        Transaction::Income(_) => "+",
    };
    format!("{}{}", sign, format_currency(t.amount(), currency))
}

fn dashboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let profile = load_profile(conn)?;
    let summary = DashboardSummary::build(&profile, today(sub)?);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let ccy = summary.currency.as_str();

    if let Some(alert) = summary.budget_alert() {
        println!("Budget Alert! {}", alert.message());
        for f in alert.flagged() {
            println!("  {}: Exceeded by {}", f.category, format_currency(f.overage, ccy));
        }
    }
    println!("Welcome back, {}!", summary.name);
    let totals = vec![
        vec!["Net Balance".to_string(), format_currency(summary.net_balance, ccy)],
        vec!["Total Income".to_string(), format_currency(summary.total_income, ccy)],
        vec!["Total Expenses".to_string(), format_currency(summary.total_expenses, ccy)],
        vec!["Weekly Expenses".to_string(), format_currency(summary.weekly_expenses, ccy)],
        vec!["Monthly Expenses".to_string(), format_currency(summary.monthly_expenses, ccy)],
    ];
    println!("{}", pretty_table(&["Summary", "Amount"], totals));

    if summary.recent.is_empty() {
        println!("No transactions yet. Start by adding an expense or income!");
        return Ok(());
    }
    let recent = summary
        .recent
        .iter()
        .map(|t| {
            let label = match (t.description(), t) {
                ("", Transaction::Expense(e)) => e.category.clone().unwrap_or_default(),
                ("", Transaction::Income(_)) => "Income".to_string(),
                (d, _) => d.to_string(),
            };
            vec![t.date().to_string(), label, signed(t, ccy)]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Description", "Amount"], recent));
    Ok(())
}

fn breakdown_rows(rows: &[BreakdownRow], ccy: &str) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.key.clone(),
                format_currency(r.amount, ccy),
                format!("{:.1}%", r.percentage),
            ]
        })
        .collect()
}

fn analytics(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let profile = load_profile(conn)?;
    let window = required(sub, "period")?
        .parse::<AnalyticsWindow>()
        .map_err(|e| anyhow!(e))?;
    let report = AnalyticsReport::build(&profile, window, today(sub)?);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = profile.currency.as_str();
    let totals = vec![
        vec!["Total Expenses".to_string(), format_currency(report.total_expenses, ccy)],
        vec!["Total Income".to_string(), format_currency(report.total_income, ccy)],
        vec!["Net Balance".to_string(), format_currency(report.net_balance, ccy)],
    ];
    println!("{}", pretty_table(&["Summary", "Amount"], totals));
    if report.expense_count == 0 {
        println!("No expense data available for the selected period.");
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Category", "Amount", "Share"],
            breakdown_rows(&report.by_category, ccy)
        )
    );
    println!(
        "{}",
        pretty_table(
            &["Payment Method", "Amount", "Share"],
            breakdown_rows(&report.by_payment_method, ccy)
        )
    );
    let trend = report
        .trend
        .iter()
        .map(|d| vec![d.date.format("%b %-d").to_string(), format_currency(d.amount, ccy)])
        .collect();
    println!("{}", pretty_table(&["Day", "Spent"], trend));
    Ok(())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let profile = load_profile(conn)?;
    let days = sub.get_one::<u64>("days").copied().unwrap_or(7);
    let data = spending_trend(&profile.expenses, today(sub)?, days);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|d| {
            vec![
                d.date.to_string(),
                format_currency(d.amount, &profile.currency),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Spent"], rows));
    Ok(())
}
