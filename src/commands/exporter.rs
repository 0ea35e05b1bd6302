// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::ExportSummary;
use crate::commands::{load_profile, today};
use crate::models::{Expense, Income};
use anyhow::{Context, Result, anyhow};
use csv::WriterBuilder;
use rusqlite::Connection;
use serde::Serialize;
use std::fs::File;
use std::io::Write;

pub const CSV_HEADER: [&str; 7] = [
    "Type",
    "Date",
    "Amount",
    "Description",
    "Category",
    "Payment Method",
    "Notes",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    #[serde(rename = "Type")]
    pub kind: &'static str,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Payment Method")]
    pub payment_method: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

/// Expenses first, then income, in stored order.
pub fn export_records(expenses: &[Expense], income: &[Income]) -> Vec<ExportRecord> {
    let expense_rows = expenses.iter().map(|e| ExportRecord {
        kind: "Expense",
        date: e.date.to_string(),
        amount: e.amount.to_string(),
        description: e.description.clone(),
        category: e.category.clone().unwrap_or_default(),
        payment_method: e
            .payment_method
            .map(|m| m.to_string())
            .unwrap_or_default(),
        notes: e.notes.clone().unwrap_or_default(),
    });
    let income_rows = income.iter().map(|i| ExportRecord {
        kind: "Income",
        date: i.date.to_string(),
        amount: i.amount.to_string(),
        description: i.description.clone(),
        category: String::new(),
        payment_method: String::new(),
        notes: String::new(),
    });
    expense_rows.chain(income_rows).collect()
}

/// Fields holding a comma, quote, or newline are quoted with inner quotes
/// doubled.
pub fn write_csv<W: Write>(out: W, expenses: &[Expense], income: &[Income]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record(CSV_HEADER)?;
    for rec in export_records(expenses, income) {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut out: W, expenses: &[Expense], income: &[Income]) -> Result<()> {
    let records = export_records(expenses, income);
    serde_json::to_writer_pretty(&mut out, &records)?;
    out.flush()?;
    Ok(())
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let profile = load_profile(conn)?;
    let summary = ExportSummary::build(&profile);
    if summary.total_transactions == 0 {
        return Err(anyhow!("No data to export. Add some transactions first!"));
    }

    let out = match sub.get_one::<String>("out") {
        Some(p) => p.clone(),
        None => format!("expense-tracker-data-{}.{}", today(sub)?, fmt),
    };
    let file = File::create(&out).with_context(|| format!("Create {}", out))?;
    match fmt.as_str() {
        "csv" => write_csv(file, &profile.expenses, &profile.income)?,
        _ => write_json(file, &profile.expenses, &profile.income)?,
    }
    println!(
        "Exported {} transaction(s) ({} expenses, {} income) to {}",
        summary.total_transactions, summary.expense_count, summary.income_count, out
    );
    Ok(())
}
