//! Display formatting for cell values.
//!
//! Display text is what the renderer draws, what the clipboard receives, and
//! what users see. It is never fed back into editing; the editor seeds its
//! draft from the raw value instead.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::config::GridConfig;
use crate::types::{CellValue, ColumnKind};

/// Format a number in its shortest round-trip form (`2000`, `1234.5`).
pub fn format_general(value: f64) -> String {
    if value == 0.0 {
        // Normalizes -0
        return "0".to_string();
    }
    format!("{value}")
}

/// Format with thousands separators and a fixed number of decimals.
pub fn format_with_thousands(value: f64, decimals: usize) -> String {
    let is_negative = value < 0.0;
    let formatted = format!("{:.prec$}", value.abs(), prec = decimals.min(10));
    let (int_part, dec_part) = match formatted.split_once('.') {
        Some((int_part, dec)) => (int_part, Some(dec)),
        None => (formatted.as_str(), None),
    };

    let mut with_sep = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_sep.push(',');
        }
        with_sep.push(c);
    }
    let int_with_sep: String = with_sep.chars().rev().collect();

    let result = match dec_part {
        Some(dec) => format!("{int_with_sep}.{dec}"),
        None => int_with_sep,
    };

    // "-0.00" reads as a bug in a ledger
    if is_negative && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{result}")
    } else {
        result
    }
}

/// `AED 1,234.50`
pub fn format_currency(value: f64, currency_code: &str) -> String {
    let amount = format_with_thousands(value, 2);
    if currency_code.is_empty() {
        amount
    } else {
        format!("{currency_code} {amount}")
    }
}

/// Format a date with a `chrono` format string, falling back to ISO when the
/// format string is invalid.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        return date.to_string();
    }
    out
}

/// Default display text for a value in a column of `kind`.
pub fn display_text(value: &CellValue, kind: ColumnKind, config: &GridConfig) -> String {
    match (value, kind) {
        (CellValue::Empty, _) => String::new(),
        (CellValue::Bool(b), _) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        (CellValue::Number(n), ColumnKind::Currency) => format_currency(*n, &config.currency_code),
        (CellValue::Number(n), _) => format_general(*n),
        (CellValue::Date(d), _) => format_date(*d, &config.date_format),
        (CellValue::Text(s), _) => s.clone(),
    }
}

/// Parse the `YYYY-MM-DD` prefix of a date or datetime string.
pub(crate) fn parse_iso_prefix(s: &str) -> Option<NaiveDate> {
    let head = s.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
