//! Type-aware conversion between raw cell values and editor drafts.

use chrono::NaiveDate;

use crate::format::{format_general, parse_iso_prefix};
use crate::types::{CellValue, ColumnKind};

/// Seed an edit draft from a raw value.
///
/// - dates become `YYYY-MM-DD`
/// - currency becomes a bare two-decimal number (`1234.50`), with symbols and
///   thousands separators stripped from currency-formatted text
/// - numbers use their plain decimal form
pub fn seed_draft(value: &CellValue, kind: ColumnKind) -> String {
    match (value, kind) {
        (CellValue::Empty, _) => String::new(),
        (CellValue::Number(n), ColumnKind::Currency) => format!("{n:.2}"),
        (CellValue::Number(n), _) => format_general(*n),
        (CellValue::Text(s), ColumnKind::Number | ColumnKind::Currency) => strip_numeric(s),
        (CellValue::Text(s), ColumnKind::Date) => {
            parse_iso_prefix(s).map_or_else(|| s.clone(), |d| d.to_string())
        }
        (CellValue::Text(s), ColumnKind::Text) => s.clone(),
        (CellValue::Date(d), _) => d.to_string(),
        (CellValue::Bool(b), _) => b.to_string(),
    }
}

/// Parse a committed draft back into a typed value.
///
/// Numeric drafts are lenient: formatting characters are stripped, and an
/// empty or unparseable result becomes `0` rather than an error.
pub fn parse_draft(draft: &str, kind: ColumnKind) -> CellValue {
    match kind {
        ColumnKind::Number | ColumnKind::Currency => CellValue::Number(parse_lenient_number(draft)),
        ColumnKind::Date => {
            let trimmed = draft.trim();
            if trimmed.is_empty() {
                CellValue::Empty
            } else {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .map_or_else(|_| CellValue::Text(trimmed.to_string()), CellValue::Date)
            }
        }
        ColumnKind::Text => CellValue::Text(draft.to_string()),
    }
}

/// Keep only digits, the decimal point and a minus sign.
pub fn strip_numeric(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// `"AED 1,234.50"` -> `1234.5`; `"abc"` or `""` -> `0`.
pub fn parse_lenient_number(text: &str) -> f64 {
    strip_numeric(text)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Apply `steps` increments of `step` to `current`, floor-clamped at 0 and
/// rounded to 2 decimal places.
pub fn step_value(current: f64, steps: i32, step: f64) -> f64 {
    let next = current + f64::from(steps) * step;
    let rounded = (next * 100.0).round() / 100.0;
    if rounded.is_finite() {
        rounded.max(0.0)
    } else {
        0.0
    }
}
