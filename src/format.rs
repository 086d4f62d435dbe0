//! Display formatting for bill dates and status codes.
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

// chrono accepts un-padded fields for `%Y-%m-%d`, so gate on the exact
// `yyyy-mm-dd` shape first.
static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

// Three-letter French month abbreviations; June and July collapse to the
// same abbreviation, as the short locale forms do.
const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Result of formatting a stored date: the display string and the parsed
/// date used for ordering. `sort_key` is `None` when the input is not a
/// valid `yyyy-mm-dd` calendar date; such bills render their raw value and
/// order as oldest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDate {
    pub display: String,
    pub sort_key: Option<NaiveDate>,
}

/// Format a stored `yyyy-mm-dd` date into its display form, e.g.
/// `2022-04-23` -> `23 Avr. 22`. Unparsable input falls back to the raw
/// string with no sort key.
pub fn format_date(raw: &str) -> FormattedDate {
    match parse_iso(raw) {
        Some(date) => FormattedDate {
            display: short_date(date),
            sort_key: Some(date),
        },
        None => FormattedDate {
            display: raw.to_string(),
            sort_key: None,
        },
    }
}

/// Secondary rendering used alongside the primary one: `dd/mm/yyyy` when
/// the date parses, the raw string otherwise. Never fails.
pub fn numeric_date(raw: &str) -> String {
    match parse_iso(raw) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => raw.to_string(),
    }
}

/// Display label for a bill status code. Codes this client does not know
/// pass through unchanged so newer server-side statuses render as-is.
pub fn status_label(code: &str) -> &str {
    match code {
        "pending" => "En attente",
        "accepted" => "Accepté",
        "refused" => "Refused",
        other => other,
    }
}

fn parse_iso(raw: &str) -> Option<NaiveDate> {
    if !ISO_DATE.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn short_date(date: NaiveDate) -> String {
    let month = MONTH_ABBREV[date.month0() as usize];
    format!("{} {}. {}", date.day(), month, date.format("%y"))
}
