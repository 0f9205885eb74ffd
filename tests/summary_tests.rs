// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use paisabook::models::{Category, Emi, Expense};
use paisabook::summary::{
    emi_summary, next_emi_due, recent_expenses, spend_summary, upcoming_emis,
};
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn expense(id: i64, date: NaiveDate, amount: &str) -> Expense {
    Expense {
        id,
        date,
        amount: amount.parse::<Decimal>().unwrap(),
        category: Category::Food,
        note: None,
    }
}

fn emi(id: i64, monthly: &str, paid: u32, total: u32, start: NaiveDate, due_day: u32) -> Emi {
    Emi {
        id,
        title: format!("emi-{}", id),
        monthly_amount: monthly.parse::<Decimal>().unwrap(),
        total_months: total,
        paid_months: paid,
        due_day,
        start_date: start,
    }
}

#[test]
fn three_expenses_today_sum_in_every_bucket() {
    let today = date(2025, 3, 20);
    let snapshot = vec![
        expense(1, today, "10"),
        expense(2, today, "20"),
        expense(3, today, "30"),
    ];
    let s = spend_summary(&snapshot, today);
    assert_eq!(s.today, Decimal::from(60));
    assert_eq!(s.week, Decimal::from(60));
    assert_eq!(s.month, Decimal::from(60));
}

#[test]
fn buckets_respect_their_cutoffs() {
    let today = date(2025, 3, 20);
    let snapshot = vec![
        expense(1, today, "5"),              // all three buckets
        expense(2, date(2025, 3, 13), "7"),  // exactly 7 days back: week + month
        expense(3, date(2025, 3, 10), "11"), // month only
        expense(4, date(2025, 2, 28), "13"), // previous month: none
    ];
    let s = spend_summary(&snapshot, today);
    assert_eq!(s.today, Decimal::from(5));
    assert_eq!(s.week, Decimal::from(12));
    assert_eq!(s.month, Decimal::from(23));
}

#[test]
fn bucket_totals_match_individually_filtered_sums() {
    let today = date(2025, 3, 20);
    let snapshot = vec![
        expense(1, today, "10.50"),
        expense(2, date(2025, 3, 18), "2.25"),
        expense(3, date(2025, 3, 1), "100"),
    ];
    let s = spend_summary(&snapshot, today);
    let month_start = date(2025, 3, 1);
    let manual: Decimal = snapshot
        .iter()
        .filter(|e| e.date >= month_start)
        .map(|e| e.amount)
        .sum();
    assert_eq!(s.month, manual);
}

#[test]
fn emi_summary_counts_active_only() {
    let today = date(2025, 3, 20);
    let snapshot = vec![
        emi(1, "100", 2, 12, date(2025, 1, 1), 15),  // active, due 2025-03-15 => overdue
        emi(2, "250", 12, 12, date(2024, 1, 1), 1),  // completed
        emi(3, "50", 0, 6, date(2025, 3, 1), 22),    // active, due 2025-03-22 => due soon
        emi(4, "75", 1, 6, date(2025, 3, 1), 28),    // active, due 2025-04-28 => upcoming
    ];
    let s = emi_summary(&snapshot, today, 3);
    assert_eq!(s.active, 3);
    assert_eq!(s.monthly_total, Decimal::from(225));
    // overdue and due-soon both count toward the warning
    assert_eq!(s.due_soon, 2);
}

#[test]
fn completed_emi_never_counts_due_soon() {
    let today = date(2025, 3, 20);
    // completed but with a stale-looking due date in the past
    let snapshot = vec![emi(1, "100", 6, 6, date(2024, 1, 1), 15)];
    let s = emi_summary(&snapshot, today, 7);
    assert_eq!(s.active, 0);
    assert_eq!(s.due_soon, 0);
    assert_eq!(s.monthly_total, Decimal::ZERO);
}

#[test]
fn recent_is_a_prefix_of_the_snapshot() {
    let today = date(2025, 3, 20);
    let snapshot: Vec<Expense> = (0..8)
        .map(|i| expense(i, today - chrono::Duration::days(i), "1"))
        .collect();
    let recent = recent_expenses(&snapshot, 5);
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].id, 0);
    // limit larger than the snapshot is fine
    assert_eq!(recent_expenses(&snapshot, 50).len(), 8);
}

#[test]
fn upcoming_sorted_by_due_date_and_limited() {
    let today = date(2025, 3, 1);
    let snapshot = vec![
        emi(1, "10", 0, 12, date(2025, 3, 1), 25),
        emi(2, "10", 0, 12, date(2025, 3, 1), 5),
        emi(3, "10", 0, 12, date(2025, 3, 1), 15),
        emi(4, "10", 12, 12, date(2024, 1, 1), 1), // completed, excluded
    ];
    let upcoming = upcoming_emis(&snapshot, today, 3, 3);
    let ids: Vec<i64> = upcoming.iter().map(|(e, _, _)| e.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);

    let limited = upcoming_emis(&snapshot, today, 3, 2);
    assert_eq!(limited.len(), 2);

    let next = next_emi_due(&snapshot, today, 3).unwrap();
    assert_eq!(next.0.id, 2);
    assert_eq!(next.1, date(2025, 3, 5));
}

#[test]
fn no_active_emis_has_no_next_due() {
    let today = date(2025, 3, 1);
    let snapshot = vec![emi(1, "10", 12, 12, date(2024, 1, 1), 1)];
    assert!(next_emi_due(&snapshot, today, 3).is_none());
}
