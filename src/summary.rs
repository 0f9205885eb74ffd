// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived statistics. Every function here is a pure function of the
//! snapshot it is handed; nothing is persisted or cached.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Emi, Expense};
use crate::schedule::{self, DueStatus};

#[derive(Debug, Default, Serialize)]
pub struct SpendSummary {
    pub today: Decimal,
    pub week: Decimal,
    pub month: Decimal,
}

/// Bucketed spend totals: today, trailing 7 days, and the calendar month
/// to date. The buckets nest by design, so an expense dated today counts
/// in all three.
pub fn spend_summary(expenses: &[Expense], today: NaiveDate) -> SpendSummary {
    let week_start = today - Duration::days(7);
    let month_start = today.with_day(1).unwrap_or(today);

    let total_since = |cutoff: NaiveDate| {
        expenses
            .iter()
            .filter(|e| e.date >= cutoff)
            .map(|e| e.amount)
            .sum::<Decimal>()
    };

    SpendSummary {
        today: total_since(today),
        week: total_since(week_start),
        month: total_since(month_start),
    }
}

#[derive(Debug, Default, Serialize)]
pub struct EmiSummary {
    pub active: usize,
    pub monthly_total: Decimal,
    pub due_soon: usize,
}

/// Active count, the monthly outgo across active EMIs, and how many of
/// them are overdue or due within the look-ahead window.
pub fn emi_summary(emis: &[Emi], today: NaiveDate, window_days: i64) -> EmiSummary {
    let active: Vec<&Emi> = emis.iter().filter(|e| !e.is_completed()).collect();
    let monthly_total = active.iter().map(|e| e.monthly_amount).sum::<Decimal>();
    let due_soon = emis
        .iter()
        .filter(|e| !e.is_completed())
        .map(|e| schedule::due_status(schedule::next_due_date(e), today, window_days))
        .filter(|&status| schedule::needs_attention(status))
        .count();

    EmiSummary {
        active: active.len(),
        monthly_total,
        due_soon,
    }
}

/// The snapshot is ordered by date descending, so recency is a prefix.
pub fn recent_expenses(expenses: &[Expense], limit: usize) -> &[Expense] {
    &expenses[..limit.min(expenses.len())]
}

/// Active EMIs sorted by next due date ascending, truncated to `limit`.
pub fn upcoming_emis(
    emis: &[Emi],
    today: NaiveDate,
    window_days: i64,
    limit: usize,
) -> Vec<(Emi, NaiveDate, DueStatus)> {
    let mut upcoming: Vec<(Emi, NaiveDate, DueStatus)> = emis
        .iter()
        .filter(|e| !e.is_completed())
        .map(|e| {
            let due = schedule::next_due_date(e);
            (e.clone(), due, schedule::due_status(due, today, window_days))
        })
        .collect();
    upcoming.sort_by_key(|(_, due, _)| *due);
    upcoming.truncate(limit);
    upcoming
}

pub fn next_emi_due(
    emis: &[Emi],
    today: NaiveDate,
    window_days: i64,
) -> Option<(Emi, NaiveDate, DueStatus)> {
    upcoming_emis(emis, today, window_days, 1).into_iter().next()
}
