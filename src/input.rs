//! Validation of raw prompt answers.
//!
//! Nothing here reads from a terminal: each function takes the text the user
//! typed and either accepts it or asks for the question to be repeated.

use chrono::Weekday;

use crate::filter::{DayFilter, MonthFilter};
use crate::table::City;

/// Answer that selects "no filter" for month or day.
pub const NO_FILTER: &str = "all";

pub const CITY_CHOICES: &[&str] = &["C", "N", "W"];
/// Only the first half-year is offered even where the data covers more.
pub const MONTH_CHOICES: &[&str] = &["1", "2", "3", "4", "5", "6", NO_FILTER];
pub const DAY_CHOICES: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
    NO_FILTER,
];
pub const YES_NO_CHOICES: &[&str] = &["yes", "no"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validated<T> {
    Accepted(T),
    Reprompt,
}

impl<T> Validated<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        match self {
            Validated::Accepted(v) => Validated::Accepted(f(v)),
            Validated::Reprompt => Validated::Reprompt,
        }
    }

    pub fn accepted(self) -> Option<T> {
        match self {
            Validated::Accepted(v) => Some(v),
            Validated::Reprompt => None,
        }
    }
}

/// Accepts `raw` if it is exactly one of `accepted`; surrounding whitespace
/// (including the trailing newline from a line read) is ignored.
pub fn validate<'a>(raw: &str, accepted: &[&'a str]) -> Validated<&'a str> {
    let raw = raw.trim();
    accepted
        .iter()
        .find(|choice| **choice == raw)
        .map_or(Validated::Reprompt, |choice| Validated::Accepted(*choice))
}

pub fn parse_city(raw: &str) -> Validated<City> {
    match validate(raw, CITY_CHOICES) {
        Validated::Accepted(code) => code
            .parse::<City>()
            .map_or(Validated::Reprompt, Validated::Accepted),
        Validated::Reprompt => Validated::Reprompt,
    }
}

pub fn parse_month(raw: &str) -> Validated<MonthFilter> {
    match validate(raw, MONTH_CHOICES) {
        Validated::Accepted(NO_FILTER) => Validated::Accepted(MonthFilter::All),
        Validated::Accepted(m) => m
            .parse::<u32>()
            .ok()
            .and_then(|m| MonthFilter::month(m).ok())
            .map_or(Validated::Reprompt, Validated::Accepted),
        Validated::Reprompt => Validated::Reprompt,
    }
}

pub fn parse_day(raw: &str) -> Validated<DayFilter> {
    match validate(raw, DAY_CHOICES) {
        Validated::Accepted(NO_FILTER) => Validated::Accepted(DayFilter::All),
        Validated::Accepted(d) => d
            .parse::<Weekday>()
            .map_or(Validated::Reprompt, |d| Validated::Accepted(DayFilter::Only(d))),
        Validated::Reprompt => Validated::Reprompt,
    }
}

/// Strict yes/no used by the raw-data pager.
pub fn parse_yes_no(raw: &str) -> Validated<bool> {
    validate(raw, YES_NO_CHOICES).map(|answer| answer == "yes")
}

/// Restart answers are case-insensitive and anything but "yes" ends the session.
pub fn wants_restart(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("yes")
}
