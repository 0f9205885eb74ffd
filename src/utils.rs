// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Timelike};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::models::{Currency, User};
use crate::schedule::DEFAULT_DUE_SOON_DAYS;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn time_greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Morning"
    } else if hour < 17 {
        "Afternoon"
    } else {
        "Evening"
    }
}

pub fn current_hour() -> u32 {
    chrono::Local::now().hour()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Format an amount in the display currency: symbol prefix, two fixed
/// decimals, Indian digit grouping for INR and thousands grouping for the
/// rest. The preference never converts the stored value.
pub fn format_amount(amount: &Decimal, ccy: Currency) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let (digits, negative) = match fixed.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (fixed.as_str(), false),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    let grouped = if ccy.indian_grouping() {
        group_indian(int_part)
    } else {
        group_thousands(int_part)
    };
    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        ccy.symbol(),
        grouped,
        frac_part
    )
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Indian grouping: last three digits, then groups of two (12,34,567).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let head_chars: Vec<char> = head.chars().collect();
    let mut idx = head_chars.len();
    while idx > 0 {
        let start = idx.saturating_sub(2);
        groups.push(head_chars[start..idx].iter().collect::<String>());
        idx = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Destructive operations are gated on an explicit yes; anything else
/// cancels and leaves state untouched.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read confirmation")?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

// Settings helpers

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn clear_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

pub fn due_soon_window(conn: &Connection) -> Result<i64> {
    match get_setting(conn, "due_soon_days")? {
        Some(s) => s
            .parse::<i64>()
            .with_context(|| format!("Invalid due_soon_days setting '{}'", s)),
        None => Ok(DEFAULT_DUE_SOON_DAYS),
    }
}

// Session helpers. The signed-in user is a setting; its absence gates
// every data operation.

pub fn find_user(conn: &Connection, email: &str) -> Result<Option<User>> {
    let row: Option<(i64, String, String, String)> = conn
        .query_row(
            "SELECT id, email, display_name, currency FROM users WHERE email=?1",
            params![email],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .optional()?;
    Ok(row.map(|(id, email, display_name, ccy)| User {
        id,
        email,
        display_name,
        // unknown codes fall back to the signup default
        currency: Currency::from_str(&ccy).unwrap_or(Currency::Usd),
    }))
}

pub fn active_user(conn: &Connection) -> Result<Option<User>> {
    match get_setting(conn, "active_user")? {
        Some(email) => find_user(conn, &email),
        None => Ok(None),
    }
}

pub fn require_user(conn: &Connection) -> Result<User> {
    active_user(conn)?
        .context("Not signed in. Run 'paisabook user login <email>' or 'paisabook user signup'")
}
