// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal_macros::dec;
use spendlog::commands::{self, budgets, categories, setup, transactions};
use spendlog::{cli, db};

fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["spendlog", "--as-of", "2024-01-15"];
    argv.extend_from_slice(args);
    cli::build_cli().get_matches_from(argv)
}

fn run_setup(conn: &Connection) {
    let m = matches(&["setup", "--name", "Asha", "--currency", "$"]);
    let (_, sub) = m.subcommand().unwrap();
    setup::handle(conn, sub).unwrap();
}

fn run_tx(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["tx"];
    argv.extend_from_slice(args);
    let m = matches(&argv);
    let (_, sub) = m.subcommand().unwrap();
    transactions::handle(conn, sub)
}

fn list(conn: &Connection, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["tx", "list"];
    argv.extend_from_slice(args);
    let m = matches(&argv);
    let (_, tx) = m.subcommand().unwrap();
    let (_, sub) = tx.subcommand().unwrap();
    transactions::query_rows(conn, sub).unwrap()
}

#[test]
fn commands_require_setup() {
    let conn = conn();
    let err = run_tx(&conn, &["add-income", "--amount", "10", "--description", "x"]).unwrap_err();
    assert_eq!(err.to_string(), "Setup has not been completed");
}

#[test]
fn setup_runs_once() {
    let conn = conn();
    run_setup(&conn);
    assert!(db::is_setup_complete(&conn));

    let m = matches(&["setup", "--name", "Again"]);
    let (_, sub) = m.subcommand().unwrap();
    assert!(setup::handle(&conn, sub).is_err());
    assert_eq!(commands::load_profile(&conn).unwrap().name, "Asha");
}

#[test]
fn add_list_and_remove() {
    let conn = conn();
    run_setup(&conn);
    run_tx(
        &conn,
        &[
            "add-expense",
            "--amount",
            "12.50",
            "--description",
            "Lunch",
            "--category",
            "Food",
            "--method",
            "upi",
            "--notes",
            "with team",
        ],
    )
    .unwrap();
    run_tx(
        &conn,
        &[
            "add-expense",
            "--date",
            "2024-01-02",
            "--amount",
            "40",
            "--description",
            "Cinema",
            "--category",
            "Entertainment",
        ],
    )
    .unwrap();
    run_tx(
        &conn,
        &[
            "add-income",
            "--date",
            "2024-01-01",
            "--amount",
            "1000",
            "--description",
            "Salary",
        ],
    )
    .unwrap();

    let all = list(&conn, &[]);
    let ids: Vec<u64> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    // --as-of supplies the default date
    assert_eq!(all[0].date, "2024-01-15");
    assert_eq!(all[0].amount, "12.50");
    assert_eq!(all[0].payment_method, "UPI");
    assert_eq!(all[0].notes, "with team");
    assert_eq!(all[1].payment_method, "Cash");
    assert_eq!(all[2].kind, "income");

    assert_eq!(list(&conn, &["--limit", "1"]).len(), 1);
    assert_eq!(list(&conn, &["--type", "income"])[0].id, 3);
    assert_eq!(list(&conn, &["--method", "UPI"]).len(), 1);
    assert_eq!(list(&conn, &["--search", "cine"])[0].id, 2);
    assert_eq!(
        list(&conn, &["--from", "2024-01-02", "--to", "2024-01-14"]).len(),
        1
    );

    run_tx(&conn, &["rm", "--id", "2"]).unwrap();
    assert!(run_tx(&conn, &["rm", "--id", "3"]).is_err());
    run_tx(&conn, &["rm", "--id", "3", "--type", "income"]).unwrap();
    let left = list(&conn, &[]);
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].description, "Lunch");
}

#[test]
fn rejected_input_is_not_saved() {
    let conn = conn();
    run_setup(&conn);
    let unknown = run_tx(
        &conn,
        &[
            "add-expense",
            "--amount",
            "5",
            "--description",
            "Rent",
            "--category",
            "Housing",
        ],
    );
    assert!(unknown.is_err());
    let zero = run_tx(
        &conn,
        &["add-income", "--amount", "0", "--description", "Refund"],
    );
    assert!(zero.is_err());
    assert!(list(&conn, &[]).is_empty());
}

#[test]
fn custom_category_then_budget_status() {
    let conn = conn();
    run_setup(&conn);

    let m = matches(&["category", "add", "--name", "Housing"]);
    let (_, sub) = m.subcommand().unwrap();
    categories::handle(&conn, sub).unwrap();
    let profile = commands::load_profile(&conn).unwrap();
    let rows = categories::list_rows(&profile.categories);
    assert_eq!(rows.last().unwrap(), &vec!["Housing".to_string(), "custom".to_string()]);

    run_tx(
        &conn,
        &[
            "add-expense",
            "--date",
            "2024-01-10",
            "--amount",
            "900",
            "--description",
            "Rent",
            "--category",
            "Housing",
        ],
    )
    .unwrap();

    let m = matches(&[
        "budget",
        "set-category",
        "--period",
        "monthly",
        "--limit",
        "Housing=800",
        "--limit",
        "Food=100",
    ]);
    let (_, b) = m.subcommand().unwrap();
    budgets::handle(&conn, b).unwrap();

    let m = matches(&["budget", "status"]);
    let (_, b) = m.subcommand().unwrap();
    let (_, sub) = b.subcommand().unwrap();
    let report = budgets::status_report(&conn, sub).unwrap();
    assert!(report.exceeded);
    assert_eq!(report.message, "Budget exceeded in 1 category(ies)!");
    let flagged = report.status.flagged();
    assert_eq!(flagged[0].category, "Housing");
    assert_eq!(flagged[0].overage, dec!(100));

    let v = serde_json::to_value(&report).unwrap();
    assert_eq!(v["kind"], "per_category");
    assert_eq!(v["exceeded"], true);
}

#[test]
fn setup_does_not_overwrite_unreadable_data() {
    let conn = conn();
    conn.execute(
        "INSERT INTO kv(key, value) VALUES (?1, ?2)",
        rusqlite::params![db::USER_DATA_KEY, "{not json"],
    )
    .unwrap();
    let m = matches(&["setup", "--name", "Asha"]);
    let (_, sub) = m.subcommand().unwrap();
    let err = setup::handle(&conn, sub).unwrap_err();
    assert!(err.to_string().contains("reset --yes"));
    assert!(db::has_unreadable_data(&conn));

    let m = matches(&["reset", "--yes"]);
    let (_, sub) = m.subcommand().unwrap();
    setup::reset(&conn, sub).unwrap();
    run_setup(&conn);
    assert!(db::is_setup_complete(&conn));
}

#[test]
fn trend_days_are_bounded() {
    let too_many = cli::build_cli().try_get_matches_from([
        "spendlog",
        "report",
        "trend",
        "--days",
        "18446744073709551615",
    ]);
    assert!(too_many.is_err());
    let zero = cli::build_cli().try_get_matches_from(["spendlog", "report", "trend", "--days", "0"]);
    assert!(zero.is_err());

    let m = matches(&["report", "trend", "--days", "366"]);
    let (_, r) = m.subcommand().unwrap();
    let (_, sub) = r.subcommand().unwrap();
    assert_eq!(sub.get_one::<u64>("days"), Some(&366));
}
