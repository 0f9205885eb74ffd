// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::Category;
use crate::utils::{get_setting, pretty_table};

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = collect_issues(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Nothing in the write path stops a paid count from drifting past the
/// total or a label from going stale; doctor is where those gaps surface.
pub fn collect_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) EMIs paid past their total
    let mut stmt = conn.prepare(
        "SELECT id, title, paid_months, total_months FROM emis WHERE paid_months > total_months",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let title: String = r.get(1)?;
        let paid: i64 = r.get(2)?;
        let total: i64 = r.get(3)?;
        rows.push(vec![
            "emi_overpaid".into(),
            format!("#{} '{}' {}/{}", id, title, paid, total),
        ]);
    }

    // 2) Due days outside the calendar range
    let mut stmt2 =
        conn.prepare("SELECT id, title, due_day FROM emis WHERE due_day < 1 OR due_day > 31")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let title: String = r.get(1)?;
        let day: i64 = r.get(2)?;
        rows.push(vec![
            "emi_due_day_range".into(),
            format!("#{} '{}' day {}", id, title, day),
        ]);
    }

    // 3) Expense labels outside the fixed category set
    let mut stmt3 = conn.prepare("SELECT DISTINCT category FROM expenses")?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let label: String = r.get(0)?;
        if Category::from_str(&label).is_err() {
            rows.push(vec!["unknown_category".into(), label]);
        }
    }

    // 4) Non-positive or unparseable amounts
    for (table, column) in [("expenses", "amount"), ("emis", "monthly_amount")] {
        let mut stmt4 =
            conn.prepare(&format!("SELECT id, {} FROM {} ORDER BY id", column, table))?;
        let mut cur4 = stmt4.query([])?;
        while let Some(r) = cur4.next()? {
            let id: i64 = r.get(0)?;
            let amount_s: String = r.get(1)?;
            match amount_s.parse::<Decimal>() {
                Ok(d) if d > Decimal::ZERO => {}
                _ => rows.push(vec![
                    "nonpositive_amount".into(),
                    format!("{} #{} '{}'", table, id, amount_s),
                ]),
            }
        }
    }

    // 5) Session pointing at a missing profile
    if let Some(email) = get_setting(conn, "active_user")? {
        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email=?1",
            [&email],
            |r| r.get(0),
        )?;
        if exists == 0 {
            rows.push(vec!["stale_session".into(), email]);
        }
    }

    Ok(rows)
}
