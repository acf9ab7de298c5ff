// src/dates.rs
//! Inclusive calendar date ranges (no timezones, plain `NaiveDate`).

use chrono::{Days, NaiveDate};

/// ISO calendar format used on the wire, in ledger keys and in messages.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Inclusive range of check-in dates. Cheap to copy, so every `iter()` restarts
/// from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn iter(&self) -> DateIter {
        DateIter {
            next: Some(self.start),
            end: self.end,
        }
    }

    /// Same sequence rendered as `YYYY-MM-DD` strings.
    pub fn iso_strings(&self) -> impl Iterator<Item = String> {
        self.iter().map(format_iso)
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        self.start <= d && d <= self.end
    }

    pub fn len(&self) -> usize {
        if self.start > self.end {
            return 0;
        }
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = DateIter;

    fn into_iter(self) -> DateIter {
        self.iter()
    }
}

impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = DateIter;

    fn into_iter(self) -> DateIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct DateIter {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let cur = self.next.filter(|d| *d <= self.end)?;
        // `None` at NaiveDate::MAX ends the sequence
        self.next = cur.checked_add_days(Days::new(1));
        Some(cur)
    }
}

pub fn format_iso(d: NaiveDate) -> String {
    d.format(ISO_DATE).to_string()
}

pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE).ok()
}

/// Full English weekday name, e.g. "Sunday".
pub fn weekday_name(d: NaiveDate) -> String {
    d.format("%A").to_string()
}

/// Checkout is always the night after check-in.
pub fn checkout_for(checkin: NaiveDate) -> Option<NaiveDate> {
    checkin.checked_add_days(Days::new(1))
}
