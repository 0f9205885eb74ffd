// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use paisabook::commands::config::set_currency;
use paisabook::models::Currency;
use paisabook::utils::{find_user, format_amount};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE users(id INTEGER PRIMARY KEY AUTOINCREMENT, email TEXT NOT NULL UNIQUE, display_name TEXT NOT NULL, currency TEXT NOT NULL DEFAULT 'USD', created_at TEXT NOT NULL DEFAULT (datetime('now')));
        "#,
    )
    .unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn thousands_grouping_for_western_currencies() {
    assert_eq!(format_amount(&dec("1234.5"), Currency::Usd), "$1,234.50");
    assert_eq!(format_amount(&dec("999"), Currency::Gbp), "£999.00");
    assert_eq!(
        format_amount(&dec("1234567.89"), Currency::Eur),
        "€1,234,567.89"
    );
    assert_eq!(format_amount(&dec("0.4"), Currency::Usd), "$0.40");
}

#[test]
fn indian_grouping_for_inr() {
    assert_eq!(format_amount(&dec("999"), Currency::Inr), "₹999.00");
    assert_eq!(format_amount(&dec("1000"), Currency::Inr), "₹1,000.00");
    assert_eq!(format_amount(&dec("100000"), Currency::Inr), "₹1,00,000.00");
    assert_eq!(
        format_amount(&dec("1234567.89"), Currency::Inr),
        "₹12,34,567.89"
    );
    assert_eq!(
        format_amount(&dec("123456789"), Currency::Inr),
        "₹12,34,56,789.00"
    );
}

#[test]
fn negative_amounts_keep_the_sign_outside_the_symbol() {
    assert_eq!(format_amount(&dec("-5"), Currency::Usd), "-$5.00");
    assert_eq!(format_amount(&dec("-123456"), Currency::Inr), "-₹1,23,456.00");
}

#[test]
fn currency_codes_parse_case_insensitively() {
    assert_eq!(Currency::from_str("inr").unwrap(), Currency::Inr);
    assert_eq!(Currency::from_str(" GBP ").unwrap(), Currency::Gbp);
    assert!(Currency::from_str("YEN").is_err());
}

#[test]
fn set_currency_updates_an_existing_profile() {
    let conn = setup();
    conn.execute(
        "INSERT INTO users(email, display_name, currency) VALUES ('a@b.c', 'Asha', 'USD')",
        [],
    )
    .unwrap();

    set_currency(&conn, "a@b.c", Currency::Inr).unwrap();

    let user = find_user(&conn, "a@b.c").unwrap().unwrap();
    assert_eq!(user.currency, Currency::Inr);
    // merge write leaves the rest of the profile alone
    assert_eq!(user.display_name, "Asha");
}

#[test]
fn set_currency_creates_a_missing_profile() {
    let conn = setup();
    set_currency(&conn, "new@b.c", Currency::Eur).unwrap();
    let user = find_user(&conn, "new@b.c").unwrap().unwrap();
    assert_eq!(user.currency, Currency::Eur);
}
