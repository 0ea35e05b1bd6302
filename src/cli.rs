// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

use crate::engine::MAX_TREND_DAYS;

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn period_arg() -> Arg {
    Arg::new("period")
        .long("period")
        .default_value("monthly")
        .value_parser(["weekly", "monthly"])
        .help("Budget period: weekly (last 7 days) or monthly (last 30 days)")
}

pub fn build_cli() -> Command {
    Command::new("spendlog")
        .about("Track expenses and income, set a budget, and see where the money goes")
        .version(clap::crate_version!())
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .env("SPENDLOG_DATA_DIR")
                .global(true)
                .help("Directory holding the data file (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("as_of")
                .long("as-of")
                .global(true)
                .help("Reference date YYYY-MM-DD for period windows (defaults to today)"),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .env("SPENDLOG_LOG")
                .global(true)
                .default_value("warn")
                .help("Log filter, e.g. warn, info, spendlog=debug"),
        )
        .subcommand(
            Command::new("setup")
                .about("Create the user profile")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("currency")
                        .long("currency")
                        .default_value(crate::models::DEFAULT_CURRENCY)
                        .help("Currency symbol shown next to amounts"),
                ),
        )
        .subcommand(
            Command::new("reset").about("Delete all stored data").arg(
                Arg::new("yes")
                    .long("yes")
                    .action(ArgAction::SetTrue)
                    .help("Confirm deletion"),
            ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record, list, and delete transactions")
                .subcommand(
                    Command::new("add-expense")
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .default_value("Cash")
                                .help("Cash, Card, or UPI"),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("add-income")
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["expense", "income"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("method").long("method"))
                        .arg(Arg::new("from").long("from").help("Start date, inclusive"))
                        .arg(Arg::new("to").long("to").help("End date, inclusive"))
                        .arg(Arg::new("search").long("search").help("Match in description"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(u64)),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .value_parser(["expense", "income"]),
                        ),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage expense categories")
                .subcommand(Command::new("add").arg(Arg::new("name").long("name").required(true)))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true))),
        )
        .subcommand(
            Command::new("budget")
                .about("Configure and check the budget")
                .subcommand(
                    Command::new("set-overall")
                        .arg(period_arg())
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(
                    Command::new("set-category").arg(period_arg()).arg(
                        Arg::new("limit")
                            .long("limit")
                            .required(true)
                            .action(ArgAction::Append)
                            .help("CATEGORY=AMOUNT, repeatable"),
                    ),
                )
                .subcommand(Command::new("show"))
                .subcommand(json_flags(Command::new("status"))),
        )
        .subcommand(
            Command::new("report")
                .about("Dashboard and analytics")
                .subcommand(json_flags(Command::new("dashboard")))
                .subcommand(json_flags(
                    Command::new("analytics").arg(
                        Arg::new("period")
                            .long("period")
                            .default_value("all")
                            .value_parser(["all", "monthly", "weekly"]),
                    ),
                ))
                .subcommand(json_flags(
                    Command::new("trend").arg(
                        Arg::new("days")
                            .long("days")
                            .default_value("7")
                            .value_parser(value_parser!(u64).range(1..=MAX_TREND_DAYS))
                            .help("Number of days ending today, at most one year"),
                    ),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export all transactions")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv or json"),
                )
                .arg(Arg::new("out").long("out").help("Output path")),
        )
}
