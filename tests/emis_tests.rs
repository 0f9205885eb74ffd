// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use paisabook::commands::doctor::collect_issues;
use paisabook::commands::emis::{delete_emi, insert_emi, load_emis, mark_paid};
use paisabook::models::Emi;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE users(id INTEGER PRIMARY KEY AUTOINCREMENT, email TEXT NOT NULL UNIQUE, display_name TEXT NOT NULL, currency TEXT NOT NULL DEFAULT 'USD', created_at TEXT NOT NULL DEFAULT (datetime('now')));
        CREATE TABLE expenses(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            amount TEXT NOT NULL,
            category TEXT NOT NULL,
            note TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE TABLE emis(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            monthly_amount TEXT NOT NULL,
            total_months INTEGER NOT NULL,
            paid_months INTEGER NOT NULL DEFAULT 0,
            due_day INTEGER NOT NULL,
            start_date TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )
    .unwrap();
    conn.execute(
        "INSERT INTO users(email, display_name) VALUES ('a@b.c', 'Asha')",
        [],
    )
    .unwrap();
    conn
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample(title: &str, paid: u32, total: u32, start: NaiveDate) -> Emi {
    Emi {
        id: 0,
        title: title.into(),
        monthly_amount: Decimal::from(500),
        total_months: total,
        paid_months: paid,
        due_day: 10,
        start_date: start,
    }
}

#[test]
fn snapshot_is_start_date_descending() {
    let conn = setup();
    insert_emi(&conn, 1, &sample("older", 0, 12, date(2024, 1, 1))).unwrap();
    insert_emi(&conn, 1, &sample("newer", 0, 12, date(2025, 1, 1))).unwrap();

    let snapshot = load_emis(&conn, 1).unwrap();
    let titles: Vec<&str> = snapshot.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["newer", "older"]);
}

#[test]
fn pay_increments_once_per_invocation() {
    let conn = setup();
    let id = insert_emi(&conn, 1, &sample("phone", 0, 12, date(2025, 1, 1))).unwrap();

    let updated = mark_paid(&conn, 1, id).unwrap();
    assert_eq!(updated.paid_months, 1);

    // re-triggering increments again: two clicks, two installments
    let updated = mark_paid(&conn, 1, id).unwrap();
    assert_eq!(updated.paid_months, 2);

    let stored = load_emis(&conn, 1).unwrap();
    assert_eq!(stored[0].paid_months, 2);
}

#[test]
fn pay_refuses_a_completed_emi() {
    let conn = setup();
    let id = insert_emi(&conn, 1, &sample("fridge", 5, 6, date(2024, 1, 1))).unwrap();

    mark_paid(&conn, 1, id).unwrap();
    let err = mark_paid(&conn, 1, id).unwrap_err();
    assert!(err.to_string().contains("fully paid"));

    let stored = load_emis(&conn, 1).unwrap();
    assert_eq!(stored[0].paid_months, 6);
    assert!(stored[0].is_completed());
}

#[test]
fn pay_unknown_id_errors() {
    let conn = setup();
    let err = mark_paid(&conn, 1, 42).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn completion_is_derived_from_counts() {
    let e = sample("laptop", 11, 12, date(2025, 1, 1));
    assert!(!e.is_completed());
    assert_eq!(e.remaining_months(), 1);
    assert_eq!(e.progress_percent(), 91);

    let done = sample("laptop", 12, 12, date(2025, 1, 1));
    assert!(done.is_completed());
    assert_eq!(done.remaining_months(), 0);
    assert_eq!(done.progress_percent(), 100);
}

#[test]
fn delete_removes_from_snapshot() {
    let conn = setup();
    let id = insert_emi(&conn, 1, &sample("bike", 0, 12, date(2025, 1, 1))).unwrap();
    assert!(delete_emi(&conn, 1, id).unwrap());
    assert!(load_emis(&conn, 1).unwrap().is_empty());
    // second delete is a no-op
    assert!(!delete_emi(&conn, 1, id).unwrap());
}

#[test]
fn doctor_flags_overpaid_and_stale_rows() {
    let conn = setup();
    // nothing in the write path prevents this shape arriving from elsewhere
    conn.execute(
        "INSERT INTO emis(user_id, title, monthly_amount, total_months, paid_months, due_day, start_date)
         VALUES (1, 'drifted', '100', 4, 5, 10, '2024-01-01')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO expenses(user_id, date, amount, category) VALUES (1, '2025-01-01', '-3', 'Groceries')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO settings(key, value) VALUES ('active_user', 'ghost@nowhere')",
        [],
    )
    .unwrap();

    let issues = collect_issues(&conn).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert!(kinds.contains(&"emi_overpaid"));
    assert!(kinds.contains(&"unknown_category"));
    assert!(kinds.contains(&"nonpositive_amount"));
    assert!(kinds.contains(&"stale_session"));
}

#[test]
fn doctor_is_quiet_on_a_clean_database() {
    let conn = setup();
    insert_emi(&conn, 1, &sample("clean", 1, 12, date(2025, 1, 1))).unwrap();
    assert!(collect_issues(&conn).unwrap().is_empty());
}
