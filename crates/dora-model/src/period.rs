//! Date-aware ordering for period labels
//!
//! Periods arrive as opaque strings ("2024-01", "2024-2", "Jan 2024", ...).
//! Ordering must follow the calendar, not the string: `2024-2` comes before
//! `2024-10`. Labels that cannot be read as a date sort after every dated
//! label, by string.

use chrono::{DateTime, NaiveDate};
use std::cmp::Ordering;
use std::fmt;

/// A period label paired with its parsed calendar date, if any
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeriodKey {
    date: Option<NaiveDate>,
    label: String,
}

impl PeriodKey {
    /// Parse a period label
    #[must_use]
    pub fn parse(label: &str) -> Self {
        Self {
            date: parse_period_date(label),
            label: label.to_string(),
        }
    }

    /// Original label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parsed date (first day of the month for month-only labels)
    #[inline]
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Consume into the original label
    #[inline]
    #[must_use]
    pub fn into_label(self) -> String {
        self.label
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.date, other.date) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.label.cmp(&other.label)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.label.cmp(&other.label),
        }
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Read a period label as a calendar date
///
/// Accepted forms: `YYYY-MM`, `YYYY-M`, `YYYY/MM`, `MM/YYYY`, `YYYY-MM-DD`,
/// `YYYY/MM/DD`, RFC 3339 timestamps, `Jan 2024`, `January 2024`, `Jan-2024`.
#[must_use]
pub fn parse_period_date(label: &str) -> Option<NaiveDate> {
    let s = label.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if s.starts_with(|c: char| c.is_ascii_alphabetic()) {
        let spaced = s.replace(['-', '/', ','], " ");
        let mut parts = spaced.split_whitespace();
        if let (Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next()) {
            return NaiveDate::parse_from_str(&format!("1 {month} {year}"), "%d %B %Y").ok();
        }
        return None;
    }

    let mut parts = s.split(['-', '/']);
    let (first, second) = match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => (a, b),
        _ => return None,
    };
    let (year, month) = if first.len() == 4 {
        (first, second)
    } else if second.len() == 4 {
        (second, first)
    } else {
        return None;
    };
    if month.is_empty() || month.len() > 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}
