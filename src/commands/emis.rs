// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Emi;
use crate::schedule::{due_status, next_due_date};
use crate::summary;
use crate::utils::{
    confirm, due_soon_window, format_amount, maybe_print_json, parse_date, parse_decimal,
    pretty_table, require_user, today,
};

pub const EMPTY_STATE: &str = "No EMIs yet. Add your first EMI to get started.";

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("summary", sub)) => summary_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// The EMI snapshot, start date descending with id descending as tie-break.
pub fn load_emis(conn: &Connection, user_id: i64) -> Result<Vec<Emi>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, monthly_amount, total_months, paid_months, due_day, start_date
         FROM emis WHERE user_id=?1 ORDER BY start_date DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut snapshot = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let title: String = r.get(1)?;
        let amount_s: String = r.get(2)?;
        let total_months: u32 = r.get(3)?;
        let paid_months: u32 = r.get(4)?;
        let due_day: u32 = r.get(5)?;
        let start_s: String = r.get(6)?;
        snapshot.push(Emi {
            id,
            title,
            monthly_amount: amount_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid amount '{}' in emis", amount_s))?,
            total_months,
            paid_months,
            due_day,
            start_date: parse_date(&start_s)?,
        });
    }
    Ok(snapshot)
}

pub fn insert_emi(conn: &Connection, user_id: i64, emi: &Emi) -> Result<i64> {
    conn.execute(
        "INSERT INTO emis(user_id, title, monthly_amount, total_months, paid_months, due_day, start_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            emi.title,
            emi.monthly_amount.to_string(),
            emi.total_months,
            emi.paid_months,
            emi.due_day,
            emi.start_date.to_string()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// One explicit invocation, one increment. A completed EMI refuses the
/// operation; re-invoking on an active one increments again.
pub fn mark_paid(conn: &Connection, user_id: i64, id: i64) -> Result<Emi> {
    let snapshot = load_emis(conn, user_id)?;
    let Some(emi) = snapshot.iter().find(|e| e.id == id) else {
        bail!("EMI {} not found", id);
    };
    if emi.is_completed() {
        bail!("'{}' is already fully paid", emi.title);
    }
    conn.execute(
        "UPDATE emis SET paid_months = paid_months + 1 WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    let mut updated = emi.clone();
    updated.paid_months += 1;
    Ok(updated)
}

pub fn delete_emi(conn: &Connection, user_id: i64, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM emis WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    Ok(n > 0)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let title = sub.get_one::<String>("title").unwrap().trim().to_string();
    let monthly_amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if monthly_amount <= Decimal::ZERO {
        bail!("Monthly amount must be positive");
    }
    let total_months = *sub.get_one::<u32>("months").unwrap();
    if total_months < 1 {
        bail!("Total months must be at least 1");
    }
    let due_day = *sub.get_one::<u32>("due-day").unwrap();
    if !(1..=31).contains(&due_day) {
        bail!("Due day must be between 1 and 31");
    }
    let start_date = parse_date(sub.get_one::<String>("start").unwrap())?;
    let paid_months = sub.get_one::<u32>("paid").copied().unwrap_or(0);
    if paid_months > total_months {
        bail!(
            "Paid months ({}) cannot exceed total months ({})",
            paid_months,
            total_months
        );
    }

    let emi = Emi {
        id: 0,
        title: title.clone(),
        monthly_amount,
        total_months,
        paid_months,
        due_day,
        start_date,
    };
    insert_emi(conn, user.id, &emi)?;
    println!(
        "Added EMI '{}': {}/month for {} months, due on day {}",
        title,
        format_amount(&monthly_amount, user.currency),
        total_months,
        due_day
    );
    Ok(())
}

#[derive(Serialize)]
pub struct EmiRow {
    pub id: i64,
    pub title: String,
    pub monthly: String,
    pub progress: String,
    pub remaining: u32,
    pub next_due: String,
    pub status: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = require_user(conn)?;
    let status_filter = sub.get_one::<String>("status").unwrap().as_str();
    let window = due_soon_window(conn)?;
    let now = today();

    let snapshot = load_emis(conn, user.id)?;
    let filtered: Vec<&Emi> = snapshot
        .iter()
        .filter(|e| match status_filter {
            "active" => !e.is_completed(),
            "completed" => e.is_completed(),
            _ => true,
        })
        .collect();

    let data: Vec<EmiRow> = filtered
        .iter()
        .map(|&e| {
            let due = next_due_date(e);
            let status = if e.is_completed() {
                "completed".to_string()
            } else {
                due_status(due, now, window).label().to_string()
            };
            EmiRow {
                id: e.id,
                title: e.title.clone(),
                monthly: format_amount(&e.monthly_amount, user.currency),
                progress: format!("{}/{} ({}%)", e.paid_months, e.total_months, e.progress_percent()),
                remaining: e.remaining_months(),
                next_due: due.to_string(),
                status,
            }
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
                r.title.clone(),
                r.monthly.clone(),
                r.progress.clone(),
                r.remaining.to_string(),
                r.next_due.clone(),
                r.status.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Title", "Monthly", "Paid", "Left", "Next due", "Status"],
            rows
        )
    );
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let updated = mark_paid(conn, user.id, id)?;
    if updated.is_completed() {
        println!(
            "Marked paid: '{}' {}/{} - fully paid off!",
            updated.title, updated.paid_months, updated.total_months
        );
    } else {
        println!(
            "Marked paid: '{}' {}/{}, next due {}",
            updated.title,
            updated.paid_months,
            updated.total_months,
            next_due_date(&updated)
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    if !sub.get_flag("yes") && !confirm("Are you sure you want to delete this EMI?")? {
        println!("Cancelled");
        return Ok(());
    }
    if !delete_emi(conn, user.id, id)? {
        bail!("EMI {} not found", id);
    }
    println!("EMI deleted successfully");
    Ok(())
}

fn summary_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = require_user(conn)?;
    let window = due_soon_window(conn)?;
    let snapshot = load_emis(conn, user.id)?;
    let stats = summary::emi_summary(&snapshot, today(), window);

    if maybe_print_json(json_flag, jsonl_flag, &stats)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Active EMIs".into(), stats.active.to_string()],
        vec![
            "Monthly outgo".into(),
            format_amount(&stats.monthly_total, user.currency),
        ],
        vec!["Due soon".into(), stats.due_soon.to_string()],
    ];
    println!("{}", pretty_table(&["Stat", "Value"], rows));
    Ok(())
}
