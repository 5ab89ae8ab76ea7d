use serde::Serialize;

use crate::error::{BikeshareError, Result};
use crate::mode::mode;
use crate::table::TripTable;

/// Joins start and end station into a trip key.
///
/// Known limitation: a station name containing `_` can collide with another
/// pair, e.g. ("A_B", "C") and ("A", "B_C") both become "A_B_C". Pairs whose
/// joined lengths differ never collide: ("A", "B") is "A_B" while
/// ("A_B", "") is "A_B_".
pub const PAIR_SEPARATOR: &str = "_";

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub most_common_start: String,
    pub most_common_end: String,
    pub most_common_trip: String,
}

pub fn station_stats(table: &TripTable) -> Result<StationStats> {
    let records = table.records();
    let no_data = || BikeshareError::NoData("station stats");

    let start = mode(records.iter().map(|r| r.start_station.as_str())).ok_or_else(no_data)?;
    let end = mode(records.iter().map(|r| r.end_station.as_str())).ok_or_else(no_data)?;
    let trip = mode(records.iter().map(|r| trip_key(&r.start_station, &r.end_station)))
        .ok_or_else(no_data)?;

    Ok(StationStats {
        most_common_start: start.value.to_string(),
        most_common_end: end.value.to_string(),
        most_common_trip: trip.value,
    })
}

pub fn trip_key(start: &str, end: &str) -> String {
    format!("{start}{PAIR_SEPARATOR}{end}")
}
