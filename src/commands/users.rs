// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::{params, Connection};
use std::str::FromStr;

use crate::models::Currency;
use crate::utils::{active_user, clear_setting, find_user, set_setting};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("signup", sub)) => signup(conn, sub)?,
        Some(("login", sub)) => login(conn, sub)?,
        Some(("logout", _)) => logout(conn)?,
        Some(("whoami", _)) => whoami(conn)?,
        _ => {}
    }
    Ok(())
}

fn signup(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap().trim().to_string();
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let currency = match sub.get_one::<String>("currency") {
        Some(s) => Currency::from_str(s)?,
        None => Currency::Usd,
    };

    if find_user(conn, &email)?.is_some() {
        bail!("A profile for '{}' already exists", email);
    }
    create_user(conn, &email, &name, currency)?;

    // Signing up signs the user in.
    set_setting(conn, "active_user", &email)?;
    println!("Welcome, {}! Signed in as {}", name, email);
    Ok(())
}

pub fn create_user(conn: &Connection, email: &str, name: &str, currency: Currency) -> Result<i64> {
    conn.execute(
        "INSERT INTO users(email, display_name, currency) VALUES (?1, ?2, ?3)",
        params![email, name, currency.code()],
    )?;
    Ok(conn.last_insert_rowid())
}

fn login(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap().trim().to_string();
    let Some(user) = find_user(conn, &email)? else {
        bail!(
            "No profile for '{}'. Run 'paisabook user signup --email {} --name <name>'",
            email,
            email
        );
    };
    set_setting(conn, "active_user", &user.email)?;
    println!("Signed in as {} ({})", user.display_name, user.email);
    Ok(())
}

fn logout(conn: &Connection) -> Result<()> {
    clear_setting(conn, "active_user")?;
    println!("Signed out");
    Ok(())
}

fn whoami(conn: &Connection) -> Result<()> {
    match active_user(conn)? {
        Some(user) => println!(
            "{} ({}) - display currency {} ({})",
            user.display_name,
            user.email,
            user.currency.code(),
            user.currency.symbol()
        ),
        None => println!("Not signed in"),
    }
    Ok(())
}
