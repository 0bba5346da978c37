//! Due date parsing and display formatting.

use crate::model::task::TaskValidationError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DUE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid due date regex"));

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalizes optional due-date input.
///
/// Blank input means "no due date". Non-blank input must be a real calendar
/// day written as `YYYY-MM-DD`.
pub fn normalize_due_date(raw: Option<&str>) -> Result<Option<String>, TaskValidationError> {
    let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    parse_due_date(trimmed)
        .map(|_| Some(trimmed.to_string()))
        .ok_or_else(|| TaskValidationError::InvalidDate(trimmed.to_string()))
}

/// Formats a due date for display, e.g. `2025-12-09` -> `Dec 9, 2025`.
///
/// Returns an empty string for blank or unparseable input.
pub fn format_date(value: &str) -> String {
    parse_due_date(value.trim())
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

fn parse_due_date(value: &str) -> Option<NaiveDate> {
    if !DUE_DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DUE_DATE_FORMAT).ok()
}
