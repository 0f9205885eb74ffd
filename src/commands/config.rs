// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::{params, Connection};
use std::str::FromStr;

use crate::models::Currency;
use crate::utils::{due_soon_window, pretty_table, require_user, set_setting};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-currency", sub)) => {
            let ccy = Currency::from_str(sub.get_one::<String>("currency").unwrap())?;
            let user = require_user(conn)?;
            set_currency(conn, &user.email, ccy)?;
            println!("Display currency set to {} ({})", ccy.code(), ccy.symbol());
        }
        Some(("set-due-window", sub)) => {
            let days = *sub.get_one::<i64>("days").unwrap();
            if days < 0 {
                bail!("Due window must be zero or more days");
            }
            set_setting(conn, "due_soon_days", &days.to_string())?;
            println!("EMIs now count as due soon within {} days", days);
        }
        Some(("show", _)) => show(conn)?,
        _ => {}
    }
    Ok(())
}

/// Upsert rather than a strict update: a profile row that is missing
/// entirely gets created on the spot, so the preference write never fails
/// on an absent profile.
pub fn set_currency(conn: &Connection, email: &str, ccy: Currency) -> Result<()> {
    conn.execute(
        "INSERT INTO users(email, display_name, currency) VALUES (?1, '', ?2)
         ON CONFLICT(email) DO UPDATE SET currency=excluded.currency",
        params![email, ccy.code()],
    )?;
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let user = require_user(conn)?;
    let rows = vec![
        vec!["Signed in as".into(), user.email.clone()],
        vec![
            "Display currency".into(),
            format!("{} ({})", user.currency.code(), user.currency.symbol()),
        ],
        vec![
            "Due-soon window".into(),
            format!("{} days", due_soon_window(conn)?),
        ],
    ];
    println!("{}", pretty_table(&["Preference", "Value"], rows));

    let supported: Vec<Vec<String>> = Currency::ALL
        .into_iter()
        .map(|c| vec![c.code().to_string(), c.symbol().to_string()])
        .collect();
    println!("{}", pretty_table(&["Currency", "Symbol"], supported));
    Ok(())
}
