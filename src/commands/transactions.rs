// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{dispatch, load_profile, today};
use crate::engine::{TransactionQuery, fixed2, format_currency};
use crate::models::{EntryDate, Entry, PaymentMethod, Transaction, TransactionKind};
use crate::state::{Action, NewExpense, NewIncome};
use crate::utils::{
    maybe_print_json, optional_trimmed, parse_date, parse_decimal, pretty_table, required,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add-expense", sub)) => add_expense(conn, sub)?,
        Some(("add-income", sub)) => add_income(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn entry_date(sub: &clap::ArgMatches) -> Result<EntryDate> {
    let date = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw)?,
        None => today(sub)?,
    };
    Ok(EntryDate::from(date))
}

fn add_expense(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = entry_date(sub)?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let description = required(sub, "description")?.to_string();
    let category = required(sub, "category")?.trim().to_string();
    let payment_method = required(sub, "method")?
        .parse::<PaymentMethod>()
        .map_err(|e| anyhow!(e))?;
    let notes = optional_trimmed(sub, "notes");

    let state = dispatch(
        conn,
        Action::AddExpense(NewExpense {
            date: date.clone(),
            amount,
            description,
            category: category.clone(),
            payment_method,
            notes,
        }),
    )?;
    let currency = state.profile()?.currency.clone();
    println!(
        "Recorded expense {} on {} ({}, {})",
        format_currency(amount, &currency),
        date,
        category,
        payment_method
    );
    Ok(())
}

fn add_income(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = entry_date(sub)?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let description = required(sub, "description")?.to_string();

    let state = dispatch(
        conn,
        Action::AddIncome(NewIncome {
            date: date.clone(),
            amount,
            description,
        }),
    )?;
    let currency = state.profile()?.currency.clone();
    println!(
        "Recorded income {} on {}",
        format_currency(amount, &currency),
        date
    );
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<u64>("id")
        .ok_or_else(|| anyhow!("Missing required argument 'id'"))?;
    let kind = required(sub, "type")?
        .parse::<TransactionKind>()
        .map_err(|e| anyhow!(e))?;
    dispatch(conn, Action::DeleteTransaction { id, kind })?;
    println!("Deleted {} {}", kind.as_str(), id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let count = data.len();
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.kind,
                    r.date,
                    r.amount,
                    r.description,
                    r.category,
                    r.payment_method,
                    r.notes,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Type", "Date", "Amount", "Description", "Category", "Method", "Notes"],
                rows,
            )
        );
        println!("Showing {} transaction(s)", count);
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: u64,
    pub kind: String,
    pub date: String,
    pub amount: String,
    pub description: String,
    pub category: String,
    pub payment_method: String,
    pub notes: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        let notes = match t {
            Transaction::Expense(e) => e.notes.clone().unwrap_or_default(),
            Transaction::Income(_) => String::new(),
        };
        Self {
            id: t.id(),
            kind: t.kind().as_str().to_string(),
            date: t.date().to_string(),
            amount: fixed2(t.amount()),
            description: t.description().to_string(),
            category: t.category().unwrap_or_default().to_string(),
            payment_method: t
                .payment_method()
                .map(|m| m.to_string())
                .unwrap_or_default(),
            notes,
        }
    }
}

pub fn build_query(sub: &clap::ArgMatches) -> Result<TransactionQuery> {
    let kind = match sub.get_one::<String>("type") {
        Some(s) => Some(s.parse::<TransactionKind>().map_err(|e| anyhow!(e))?),
        None => None,
    };
    let payment_method = match optional_trimmed(sub, "method") {
        Some(s) => Some(s.parse::<PaymentMethod>().map_err(|e| anyhow!(e))?),
        None => None,
    };
    let start = match sub.get_one::<String>("from") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let end = match sub.get_one::<String>("to") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    Ok(TransactionQuery {
        kind,
        category: optional_trimmed(sub, "category"),
        payment_method,
        search: optional_trimmed(sub, "search"),
        start,
        end,
        limit: sub.get_one::<usize>("limit").copied(),
    })
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let profile = load_profile(conn)?;
    let query = build_query(sub)?;
    let rows = query
        .run(&profile.expenses, &profile.income)
        .iter()
        .map(TransactionRow::from)
        .collect();
    Ok(rows)
}
