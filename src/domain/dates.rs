//! Lenient date handling for record keys.
//!
//! Order and price dates arrive as strings and are allowed to be junk: a date
//! that fails to parse causes the record to be skipped from date-keyed
//! computations (and forecasting to be skipped entirely when it is the last
//! key), never an error.

use chrono::{Months, NaiveDate};

/// Accepted input formats, tried in order.
///
/// Uploads are expected to use ISO dates, but spreadsheet exports often
/// rewrite them; we accept a small deterministic set to reduce friction.
const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Parse a full date string, `None` when no accepted format matches.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    FMTS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Calendar-month key (`YYYY-MM`) for a date string.
pub fn month_key(s: &str) -> Option<String> {
    parse_date(s).map(|d| d.format("%Y-%m").to_string())
}

/// Advance a `YYYY-MM` period key by `months` calendar months.
pub fn advance_month_key(period: &str, months: u32) -> Option<String> {
    let date = NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d").ok()?;
    let advanced = date.checked_add_months(Months::new(months))?;
    Some(advanced.format("%Y-%m").to_string())
}

/// Advance a full date string by `months` calendar months, keeping ISO form.
pub fn advance_date(s: &str, months: u32) -> Option<String> {
    let advanced = parse_date(s)?.checked_add_months(Months::new(months))?;
    Some(advanced.format("%Y-%m-%d").to_string())
}

/// Sort key for chronological ordering; unparseable dates sort first.
pub fn sort_key(s: &str) -> NaiveDate {
    parse_date(s).unwrap_or(NaiveDate::MIN)
}
