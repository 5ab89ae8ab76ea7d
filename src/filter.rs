//! Month and day-of-week filtering of trip tables.

use chrono::Weekday;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::table::{TripRecord, TripTable, day_name};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum MonthFilter {
    #[default]
    All,
    Only(u32),
}

impl MonthFilter {
    /// A filter for calendar month `month` (1 = January).
    pub fn month(month: u32) -> Result<Self> {
        if (1..=12).contains(&month) {
            Ok(MonthFilter::Only(month))
        } else {
            Err(BikeshareError::InvalidFilter(format!(
                "month {month} is outside 1..=12"
            )))
        }
    }

    pub fn matches(self, record: &TripRecord) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(m) => record.month == m,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DayFilter {
    #[default]
    All,
    Only(Weekday),
}

impl DayFilter {
    pub fn matches(self, record: &TripRecord) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(d) => record.day_of_week == d,
        }
    }
}

/// The pair of optional predicates chosen for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TripFilter {
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl TripFilter {
    pub fn new(month: MonthFilter, day: DayFilter) -> Self {
        Self { month, day }
    }

    pub fn matches(&self, record: &TripRecord) -> bool {
        self.month.matches(record) && self.day.matches(record)
    }

    /// Returns a new table with only the matching records, in their original order.
    pub fn apply(&self, table: &TripTable) -> TripTable {
        let filtered = retain(table, |r| self.matches(r));
        debug!(
            filter = %self,
            before = table.len(),
            after = filtered.len(),
            "Filter applied"
        );
        filtered
    }
}

impl fmt::Display for TripFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            MonthFilter::All => f.write_str("month=all")?,
            MonthFilter::Only(m) => write!(f, "month={m}")?,
        }
        match self.day {
            DayFilter::All => f.write_str(" day=all"),
            DayFilter::Only(d) => write!(f, " day={}", day_name(d)),
        }
    }
}

/// Single-predicate month step; composes with [`by_day`] in either order.
pub fn by_month(table: &TripTable, month: MonthFilter) -> TripTable {
    retain(table, |r| month.matches(r))
}

/// Single-predicate day step; composes with [`by_month`] in either order.
pub fn by_day(table: &TripTable, day: DayFilter) -> TripTable {
    retain(table, |r| day.matches(r))
}

fn retain(table: &TripTable, keep: impl Fn(&TripRecord) -> bool) -> TripTable {
    let records = table.records().iter().filter(|&r| keep(r)).cloned().collect();
    table.with_records(records)
}
