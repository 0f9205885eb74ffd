// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::commands::{emis, expenses};
use crate::summary;
use crate::utils::{
    current_hour, due_soon_window, format_amount, pretty_table, require_user, time_greeting, today,
};

const RECENT_EXPENSES: usize = 5;
const UPCOMING_EMIS: usize = 3;

pub fn handle(conn: &Connection) -> Result<()> {
    let user = require_user(conn)?;
    let now = today();
    let window = due_soon_window(conn)?;

    let expense_snapshot = expenses::load_expenses(conn, user.id)?;
    let emi_snapshot = emis::load_emis(conn, user.id)?;

    println!("Good {}, {}!", time_greeting(current_hour()), user.display_name);
    println!();

    let spend = summary::spend_summary(&expense_snapshot, now);
    let rows = vec![
        vec!["Spent today".into(), format_amount(&spend.today, user.currency)],
        vec![
            "Spent this month".into(),
            format_amount(&spend.month, user.currency),
        ],
    ];
    println!("{}", pretty_table(&["Stat", "Value"], rows));

    println!();
    println!("Recent expenses");
    let recent = summary::recent_expenses(&expense_snapshot, RECENT_EXPENSES);
    if recent.is_empty() {
        println!("No recent expenses");
    } else {
        let rows: Vec<Vec<String>> = recent
            .iter()
            .map(|e| {
                vec![
                    e.date.to_string(),
                    e.category.to_string(),
                    format_amount(&e.amount, user.currency),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Category", "Amount"], rows));
    }

    println!();
    println!("Upcoming EMIs");
    let upcoming = summary::upcoming_emis(&emi_snapshot, now, window, UPCOMING_EMIS);
    if upcoming.is_empty() {
        println!("No active EMIs");
    } else {
        let rows: Vec<Vec<String>> = upcoming
            .iter()
            .map(|(e, due, status)| {
                vec![
                    e.title.clone(),
                    format_amount(&e.monthly_amount, user.currency),
                    due.to_string(),
                    status.label().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Title", "Monthly", "Next due", "Status"], rows)
        );
    }

    if let Some((emi, due, _)) = summary::next_emi_due(&emi_snapshot, now, window) {
        println!();
        println!(
            "Next EMI due: '{}' {} on {}",
            emi.title,
            format_amount(&emi.monthly_amount, user.currency),
            due
        );
    }
    Ok(())
}
