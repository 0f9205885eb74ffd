// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Months, NaiveDate};

use crate::models::Emi;

/// Default look-ahead window for the due-soon classification, in days.
/// Overridable via the `due_soon_days` setting.
pub const DEFAULT_DUE_SOON_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Upcoming,
}

impl DueStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DueStatus::Overdue => "overdue",
            DueStatus::DueSoon => "due soon",
            DueStatus::Upcoming => "",
        }
    }
}

pub fn month_length(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Next due date: start date advanced by the number of paid months, with
/// the day-of-month set to the stored due day, clamped to the target
/// month's length (due day 31 in February lands on the 28th/29th).
pub fn next_due_date(emi: &Emi) -> NaiveDate {
    let shifted = emi.start_date + Months::new(emi.paid_months);
    let day = emi
        .due_day
        .clamp(1, month_length(shifted.year(), shifted.month()));
    NaiveDate::from_ymd_opt(shifted.year(), shifted.month(), day).unwrap_or(shifted)
}

/// Day-granularity classification. A due date exactly today is never
/// overdue; it counts as due soon for any non-negative window.
pub fn due_status(due: NaiveDate, today: NaiveDate, window_days: i64) -> DueStatus {
    let diff = (due - today).num_days();
    if diff < 0 {
        DueStatus::Overdue
    } else if diff <= window_days {
        DueStatus::DueSoon
    } else {
        DueStatus::Upcoming
    }
}

/// Overdue and due-soon EMIs both trigger the dashboard warning count.
pub fn needs_attention(status: DueStatus) -> bool {
    matches!(status, DueStatus::Overdue | DueStatus::DueSoon)
}
