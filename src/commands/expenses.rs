// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use crate::models::{Category, Expense};
use crate::summary;
use crate::utils::{
    confirm, format_amount, maybe_print_json, parse_date, parse_decimal, pretty_table,
    require_user, today,
};

pub const EMPTY_STATE: &str = "No expenses yet. Add your first expense to get started.";

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("summary", sub)) => summary_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// The expense snapshot: the user's full collection, date descending with
/// id descending as tie-break. Every view and aggregate derives from one
/// of these loads, never from cached state.
pub fn load_expenses(conn: &Connection, user_id: i64) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, amount, category, note FROM expenses
         WHERE user_id=?1 ORDER BY date DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut snapshot = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date_s: String = r.get(1)?;
        let amount_s: String = r.get(2)?;
        let category_s: String = r.get(3)?;
        let note: Option<String> = r.get(4)?;
        snapshot.push(Expense {
            id,
            date: parse_date(&date_s)?,
            amount: amount_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid amount '{}' in expenses", amount_s))?,
            // unknown labels render as Other; doctor reports them
            category: Category::from_str(&category_s).unwrap_or(Category::Other),
            note,
        });
    }
    Ok(snapshot)
}

pub fn insert_expense(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
    amount: Decimal,
    category: Category,
    note: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO expenses(user_id, date, amount, category, note)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            date.to_string(),
            amount.to_string(),
            category.as_str(),
            note
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_expense(conn: &Connection, user_id: i64, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM expenses WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    Ok(n > 0)
}

/// Category filtering happens on the loaded snapshot, not in SQL: the view
/// renders a filtered projection of the same mirror the aggregates use.
pub fn filter_snapshot<'a>(
    snapshot: &'a [Expense],
    category: Option<Category>,
) -> Vec<&'a Expense> {
    snapshot
        .iter()
        .filter(|e| category.is_none_or(|c| e.category == c))
        .collect()
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= Decimal::ZERO {
        bail!("Amount must be positive");
    }
    let category = Category::from_str(sub.get_one::<String>("category").unwrap())?;
    let note = sub.get_one::<String>("note").map(|s| s.to_string());
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };

    insert_expense(conn, user.id, date, amount, category, note.as_deref())?;
    println!(
        "Recorded {} for {} on {}",
        format_amount(&amount, user.currency),
        category,
        date
    );
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub amount: String,
    pub currency: String,
    pub note: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = require_user(conn)?;
    let category = sub
        .get_one::<String>("category")
        .map(|s| Category::from_str(s))
        .transpose()?;
    let limit = sub.get_one::<usize>("limit").copied();

    let snapshot = load_expenses(conn, user.id)?;
    let mut filtered = filter_snapshot(&snapshot, category);
    if let Some(n) = limit {
        filtered.truncate(n);
    }

    let data: Vec<ExpenseRow> = filtered
        .iter()
        .map(|e| ExpenseRow {
            id: e.id,
            date: e.date.to_string(),
            category: e.category.to_string(),
            amount: format_amount(&e.amount, user.currency),
            currency: user.currency.code().to_string(),
            note: e.note.clone().unwrap_or_default(),
        })
        .collect();

    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("{}", EMPTY_STATE);
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date.clone(),
                r.category.clone(),
                r.amount.clone(),
                r.note.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Date", "Category", "Amount", "Note"], rows)
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    if !sub.get_flag("yes")
        && !confirm("This will permanently delete the expense record. Are you sure?")?
    {
        println!("Cancelled");
        return Ok(());
    }
    if !delete_expense(conn, user.id, id)? {
        bail!("Expense {} not found", id);
    }
    println!("Expense deleted successfully");
    Ok(())
}

fn summary_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = require_user(conn)?;
    let snapshot = load_expenses(conn, user.id)?;
    let stats = summary::spend_summary(&snapshot, today());

    if maybe_print_json(json_flag, jsonl_flag, &stats)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Today".into(), format_amount(&stats.today, user.currency)],
        vec![
            "Last 7 days".into(),
            format_amount(&stats.week, user.currency),
        ],
        vec![
            "This month".into(),
            format_amount(&stats.month, user.currency),
        ],
    ];
    println!("{}", pretty_table(&["Window", "Spent"], rows));
    Ok(())
}
