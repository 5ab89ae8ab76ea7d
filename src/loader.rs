//! Dataset loader: reads a city's CSV into a [`TripTable`].

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use tracing::{debug, info};

use crate::config::CityConfig;
use crate::error::{BikeshareError, Result};
use crate::table::{City, Schema, TripRecord, TripTable};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Loads every trip for `city` from the source configured in `config`.
///
/// # Errors
///
/// `SourceNotFound` when the city has no configured source or the file is
/// missing; `ParseError` when a start time cannot be parsed.
#[tracing::instrument(skip_all, fields(city = %city))]
pub fn load_city(config: &CityConfig, city: City) -> Result<TripTable> {
    let path = config.source(city)?;
    if !path.is_file() {
        return Err(BikeshareError::SourceNotFound(path.display().to_string()));
    }

    debug!(path = %path.display(), "Opening trip source");
    let table = read_trips(File::open(path)?)?;

    info!(
        rows = table.len(),
        has_gender = table.schema().has_gender,
        has_birth_year = table.schema().has_birth_year,
        "Trip data loaded"
    );
    Ok(table)
}

/// Reads CSV trip data from any reader.
///
/// Columns are matched by header name, so column order and extra columns
/// (such as a leading unnamed index) do not matter.
pub fn read_trips<R: Read>(reader: R) -> Result<TripTable> {
    // short rows read as blank trailing cells
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::locate(rdr.headers()?)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        // header occupies line 1
        let line = row.position().map_or(i + 2, |p| p.line() as usize);
        records.push(columns.parse(&row, line)?);
    }

    Ok(TripTable::new(columns.schema(), records))
}

/// Header positions of the columns we read.
struct Columns {
    start_time: usize,
    end_time: usize,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| find(name).ok_or(BikeshareError::MissingColumn(name));

        Ok(Columns {
            start_time: require(START_TIME)?,
            end_time: require(END_TIME)?,
            trip_duration: require(TRIP_DURATION)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: require(USER_TYPE)?,
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn schema(&self) -> Schema {
        Schema {
            has_gender: self.gender.is_some(),
            has_birth_year: self.birth_year.is_some(),
        }
    }

    fn parse(&self, row: &StringRecord, line: usize) -> Result<TripRecord> {
        let cell = |idx: usize| row.get(idx).map(str::trim).unwrap_or("");
        let text = |idx: usize| Some(cell(idx)).filter(|s| !s.is_empty()).map(str::to_string);

        let start_time = parse_timestamp(cell(self.start_time)).ok_or_else(|| {
            BikeshareError::ParseError {
                row: line,
                column: START_TIME,
                value: cell(self.start_time).to_string(),
            }
        })?;

        let end_time = match cell(self.end_time) {
            "" => None,
            raw => {
                let parsed = parse_timestamp(raw);
                if parsed.is_none() {
                    debug!(row = line, value = raw, "Unreadable end time left empty");
                }
                parsed
            }
        };

        let mut record = TripRecord::new(
            start_time,
            cell(self.start_station),
            cell(self.end_station),
        );
        record.end_time = end_time;
        record.trip_duration = cell(self.trip_duration)
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite());
        record.user_type = text(self.user_type);
        record.gender = self.gender.and_then(text);
        record.birth_year = self
            .birth_year
            .and_then(|idx| cell(idx).parse::<f64>().ok())
            .and_then(birth_year);

        Ok(record)
    }
}

/// Truncates a float year ("1992.0") to a whole year; values outside `i32` are dropped.
fn birth_year(raw: f64) -> Option<i32> {
    let year = raw.trunc();
    (year.is_finite() && year >= f64::from(i32::MIN) && year <= f64::from(i32::MAX))
        .then_some(year as i32)
}

/// Parses the timestamp layouts found in the published datasets.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
