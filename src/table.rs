//! In-memory trip records and the tables that hold them.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::BikeshareError;

/// The cities with a published bikeshare dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Single-letter selector used at the prompt and in config files.
    pub fn code(self) -> &'static str {
        match self {
            City::Chicago => "C",
            City::NewYorkCity => "N",
            City::Washington => "W",
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        };
        f.write_str(name)
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| BikeshareError::SourceNotFound(s.to_string()))
    }
}

/// Full English weekday name, e.g. `Weekday::Mon` -> "Monday".
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Which optional columns the source carried.
///
/// Decided once when the table is loaded; the per-record `gender` and
/// `birth_year` fields are only meaningful when the matching flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub trip_duration: Option<f64>,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    // derived from start_time
    pub month: u32,
    pub day_of_week: Weekday,
}

impl TripRecord {
    /// Builds a record and fills in the calendar fields from `start_time`.
    pub fn new(start_time: NaiveDateTime, start_station: &str, end_station: &str) -> Self {
        TripRecord {
            start_time,
            end_time: None,
            trip_duration: None,
            start_station: start_station.to_string(),
            end_station: end_station.to_string(),
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            day_of_week: start_time.weekday(),
        }
    }

    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }
}

/// Ordered trip records for a single city, sharing one [`Schema`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    schema: Schema,
    records: Vec<TripRecord>,
}

impl TripTable {
    pub fn new(schema: Schema, records: Vec<TripRecord>) -> Self {
        Self { schema, records }
    }

    /// A table with the same schema holding `records`.
    pub fn with_records(&self, records: Vec<TripRecord>) -> Self {
        Self {
            schema: self.schema,
            records,
        }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Up to `n` records starting at `offset`; empty once past the end.
    pub fn page(&self, offset: usize, n: usize) -> &[TripRecord] {
        let start = offset.min(self.records.len());
        let end = offset.saturating_add(n).min(self.records.len());
        &self.records[start..end]
    }
}
