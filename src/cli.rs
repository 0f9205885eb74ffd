// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn yes_flag(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("yes")
            .long("yes")
            .short('y')
            .action(ArgAction::SetTrue)
            .help("Skip the confirmation prompt"),
    )
}

pub fn build_cli() -> Command {
    Command::new("paisabook")
        .about("Personal expense and EMI tracking CLI")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(user_cmd())
        .subcommand(expense_cmd())
        .subcommand(emi_cmd())
        .subcommand(Command::new("dashboard").about("Greeting, spend stats and upcoming EMIs"))
        .subcommand(config_cmd())
        .subcommand(Command::new("doctor").about("Check the database for inconsistencies"))
}

fn user_cmd() -> Command {
    Command::new("user")
        .about("Manage profiles and the signed-in session")
        .subcommand(
            Command::new("signup")
                .about("Create a profile and sign in")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("currency")
                        .long("currency")
                        .help("Display currency: USD, INR, EUR or GBP (default USD)"),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in an existing profile")
                .arg(Arg::new("email").required(true)),
        )
        .subcommand(Command::new("logout").about("Sign out"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
}

fn expense_cmd() -> Command {
    Command::new("expense")
        .about("Log and review expenses")
        .subcommand(
            Command::new("add")
                .about("Record an expense")
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .required(true)
                        .help("Food, Transport, Shopping, Bills, Entertainment, Healthcare or Other"),
                )
                .arg(Arg::new("note").long("note"))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("YYYY-MM-DD (defaults to today)"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List expenses, newest first")
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(clap::value_parser!(usize)),
                ),
        ))
        .subcommand(yes_flag(
            Command::new("rm")
                .about("Delete an expense")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        ))
        .subcommand(json_flags(
            Command::new("summary").about("Today, trailing-week and month totals"),
        ))
}

fn emi_cmd() -> Command {
    Command::new("emi")
        .about("Track installment loans")
        .subcommand(
            Command::new("add")
                .about("Add an EMI")
                .arg(Arg::new("title").long("title").required(true))
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .help("Monthly installment amount"),
                )
                .arg(
                    Arg::new("months")
                        .long("months")
                        .required(true)
                        .value_parser(clap::value_parser!(u32))
                        .help("Total number of installments"),
                )
                .arg(
                    Arg::new("due-day")
                        .long("due-day")
                        .required(true)
                        .value_parser(clap::value_parser!(u32))
                        .help("Day of month the installment falls due (1-31)"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .required(true)
                        .help("Start date, YYYY-MM-DD"),
                )
                .arg(
                    Arg::new("paid")
                        .long("paid")
                        .value_parser(clap::value_parser!(u32))
                        .help("Installments already paid (default 0)"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list").about("List EMIs, newest first").arg(
                Arg::new("status")
                    .long("status")
                    .value_parser(["all", "active", "completed"])
                    .default_value("all"),
            ),
        ))
        .subcommand(
            Command::new("pay")
                .about("Mark one installment paid")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        )
        .subcommand(yes_flag(
            Command::new("rm")
                .about("Delete an EMI")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        ))
        .subcommand(json_flags(
            Command::new("summary").about("Active count, monthly outgo and due-soon count"),
        ))
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("Preferences")
        .subcommand(
            Command::new("set-currency")
                .about("Set the display currency")
                .arg(Arg::new("currency").required(true)),
        )
        .subcommand(
            Command::new("set-due-window")
                .about("Days ahead an EMI counts as due soon")
                .arg(
                    Arg::new("days")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                ),
        )
        .subcommand(Command::new("show").about("Show current preferences"))
}
