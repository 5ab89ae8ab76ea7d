//! Report rendering and persistence.
//!
//! Supports plain-text and JSON rendering of a session report, a paged view of
//! raw trip rows, and CSV append of a one-line session summary.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::{Serialize, Serializer};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::error::BikeshareError;
use crate::filter::{DayFilter, MonthFilter, TripFilter};
use crate::stats::{ColumnSummary, DurationStats, StationStats, TimeStats, UserStats};
use crate::table::{City, TripRecord, day_name};

const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// One statistics module's result and how long it took.
#[derive(Debug)]
pub struct ModuleReport<T> {
    pub elapsed_secs: f64,
    pub outcome: std::result::Result<T, BikeshareError>,
}

#[derive(Serialize)]
struct ModuleJson<'a, T> {
    elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> Serialize for ModuleReport<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ModuleJson {
            elapsed_secs: self.elapsed_secs,
            result: self.outcome.as_ref().ok(),
            error: self.outcome.as_ref().err().map(ToString::to_string),
        }
        .serialize(serializer)
    }
}

/// Everything computed in one pass over a filtered table.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub city: City,
    pub filter: TripFilter,
    pub rows: usize,
    pub time: ModuleReport<TimeStats>,
    pub station: ModuleReport<StationStats>,
    pub duration: ModuleReport<DurationStats>,
    pub user: ModuleReport<UserStats>,
}

/// Writes `report` to `out` in the requested format.
pub fn emit(report: &SessionReport, format: Format, out: &mut impl Write) -> Result<()> {
    match format {
        Format::Text => render_text(report, out)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Human-readable report, one section per statistics module.
pub fn render_text(report: &SessionReport, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "{} trips in {} ({})",
        report.rows, report.city, report.filter
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    section(
        out,
        "Calculating The Most Frequent Times of Travel...",
        &report.time,
        |out, s| {
            writeln!(out, "The Most Common Month: {}", s.most_common_month)?;
            writeln!(out, "The Most Common Day of Week: {}", day_name(s.most_common_day))?;
            writeln!(out, "The Most Frequent Start Hour: {}", s.most_common_hour)
        },
    )?;

    section(
        out,
        "Calculating The Most Popular Stations and Trip...",
        &report.station,
        |out, s| {
            writeln!(out, "The Most Commonly Used Start Station: {}", s.most_common_start)?;
            writeln!(out, "The Most Commonly Used End Station: {}", s.most_common_end)?;
            writeln!(
                out,
                "The Most Frequent Combination of Start Station and End Station Trip: {}",
                s.most_common_trip
            )
        },
    )?;

    section(out, "Calculating Trip Duration...", &report.duration, |out, s| {
        writeln!(out, "Total Travel Time in Seconds: {}", s.total_seconds)?;
        writeln!(out, "Mean Travel Time in Seconds: {}", s.mean_seconds)
    })?;

    section(out, "Calculating User Stats...", &report.user, |out, s| {
        writeln!(out, "User Type counts:")?;
        for c in &s.user_types {
            writeln!(out, "  {:<16}{}", c.value, c.count)?;
        }

        match &s.genders {
            ColumnSummary::Present(counts) => {
                writeln!(out, "Gender counts:")?;
                for c in counts {
                    writeln!(out, "  {:<16}{}", c.value, c.count)?;
                }
            }
            ColumnSummary::Absent => writeln!(out, "No gender data available.")?,
            ColumnSummary::Empty => writeln!(out, "No gender values in the selected trips.")?,
        }

        match &s.birth_years {
            ColumnSummary::Present(b) => {
                writeln!(out, "The earliest year of birth: {}", b.earliest)?;
                writeln!(out, "The most recent year of birth: {}", b.most_recent)?;
                writeln!(out, "The most common year of birth: {}", b.most_common)
            }
            ColumnSummary::Absent => writeln!(out, "No year of birth data available."),
            ColumnSummary::Empty => {
                writeln!(out, "No year of birth values in the selected trips.")
            }
        }
    })?;

    Ok(())
}

fn section<W: Write, T>(
    out: &mut W,
    title: &str,
    report: &ModuleReport<T>,
    body: impl FnOnce(&mut W, &T) -> std::io::Result<()>,
) -> std::io::Result<()> {
    writeln!(out, "\n{title}\n")?;
    match &report.outcome {
        Ok(stats) => body(out, stats)?,
        Err(e) => writeln!(out, "Unavailable: {e}")?,
    }
    writeln!(out, "\nThis took {} seconds.", report.elapsed_secs)?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

/// Prints a page of raw trip rows.
pub fn render_rows(records: &[TripRecord], out: &mut impl Write) -> std::io::Result<()> {
    for r in records {
        let end_time = r
            .end_time
            .map(|t| t.to_string())
            .unwrap_or_default();
        let duration = r
            .trip_duration
            .map(|d| d.to_string())
            .unwrap_or_default();
        let birth_year = r.birth_year.map(|y| y.to_string()).unwrap_or_default();

        writeln!(
            out,
            "{} | {} | {} | {} | {} | {} | {} | {}",
            r.start_time,
            end_time,
            duration,
            r.start_station,
            r.end_station,
            r.user_type.as_deref().unwrap_or(""),
            r.gender.as_deref().unwrap_or(""),
            birth_year,
        )?;
    }
    Ok(())
}

/// Flat, CSV-friendly digest of a [`SessionReport`].
#[derive(Debug, Default, Serialize)]
pub struct SessionSummary {
    pub timestamp: DateTime<Utc>,
    pub city: String,
    pub month: String,
    pub day: String,
    pub rows: usize,
    pub most_common_month: Option<u32>,
    pub most_common_day: Option<String>,
    pub most_common_hour: Option<u32>,
    pub most_common_start: Option<String>,
    pub most_common_end: Option<String>,
    pub most_common_trip: Option<String>,
    pub total_seconds: Option<f64>,
    pub mean_seconds: Option<f64>,
    pub top_user_type: Option<String>,
}

impl SessionSummary {
    pub fn from_report(report: &SessionReport) -> Self {
        let time = report.time.outcome.as_ref().ok();
        let station = report.station.outcome.as_ref().ok();
        let duration = report.duration.outcome.as_ref().ok();
        let user = report.user.outcome.as_ref().ok();

        SessionSummary {
            timestamp: Utc::now(),
            city: report.city.to_string(),
            month: match report.filter.month {
                MonthFilter::All => "all".to_string(),
                MonthFilter::Only(m) => m.to_string(),
            },
            day: match report.filter.day {
                DayFilter::All => "all".to_string(),
                DayFilter::Only(d) => day_name(d).to_string(),
            },
            rows: report.rows,
            most_common_month: time.map(|t| t.most_common_month),
            most_common_day: time.map(|t| day_name(t.most_common_day).to_string()),
            most_common_hour: time.map(|t| t.most_common_hour),
            most_common_start: station.map(|s| s.most_common_start.clone()),
            most_common_end: station.map(|s| s.most_common_end.clone()),
            most_common_trip: station.map(|s| s.most_common_trip.clone()),
            total_seconds: duration.map(|d| d.total_seconds),
            mean_seconds: duration.map(|d| d.mean_seconds),
            top_user_type: user
                .and_then(|u| u.user_types.first())
                .map(|c| c.value.clone()),
        }
    }
}

/// Appends a [`SessionSummary`] as a row to a CSV file.
///
/// The header row is written when the file is missing or empty.
pub fn append_summary(path: impl AsRef<Path>, summary: &SessionSummary) -> Result<()> {
    let path = path.as_ref();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;
    debug!(path = %path.display(), needs_header, "Appending session summary");

    let mut writer = WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Counted;
    use chrono::Weekday;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_report() -> SessionReport {
        SessionReport {
            city: City::Washington,
            filter: TripFilter::new(MonthFilter::Only(3), DayFilter::All),
            rows: 3,
            time: ModuleReport {
                elapsed_secs: 0.001,
                outcome: Ok(TimeStats {
                    most_common_month: 3,
                    most_common_day: Weekday::Fri,
                    most_common_hour: 17,
                }),
            },
            station: ModuleReport {
                elapsed_secs: 0.001,
                outcome: Ok(StationStats {
                    most_common_start: "A".to_string(),
                    most_common_end: "B".to_string(),
                    most_common_trip: "A_B".to_string(),
                }),
            },
            duration: ModuleReport {
                elapsed_secs: 0.0,
                outcome: Err(BikeshareError::InvalidData {
                    row: 2,
                    column: "Trip Duration",
                }),
            },
            user: ModuleReport {
                elapsed_secs: 0.0,
                outcome: Ok(UserStats {
                    user_types: vec![Counted {
                        value: "Subscriber".to_string(),
                        count: 3,
                    }],
                    genders: ColumnSummary::Absent,
                    birth_years: ColumnSummary::Absent,
                }),
            },
        }
    }

    #[test]
    fn test_render_text() {
        let mut out = Vec::new();
        render_text(&sample_report(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("3 trips in Washington (month=3 day=all)"));
        assert!(text.contains("The Most Common Day of Week: Friday"));
        assert!(text.contains("The Most Frequent Combination of Start Station and End Station Trip: A_B"));
        assert!(text.contains("Unavailable: Invalid value in \"Trip Duration\" at row 2"));
        assert!(text.contains("No gender data available."));
        assert!(text.contains("No year of birth data available."));
        assert_eq!(text.matches("This took").count(), 4);
    }

    #[test]
    fn test_emit_json() {
        let mut out = Vec::new();
        emit(&sample_report(), Format::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["city"], "Washington");
        assert_eq!(value["rows"], 3);
        assert_eq!(value["time"]["result"]["most_common_hour"], 17);
        assert!(value["duration"]["result"].is_null());
        assert!(value["duration"]["error"].is_string());
        assert_eq!(value["user"]["result"]["genders"]["status"], "absent");
    }

    #[test]
    fn test_render_rows() {
        let start = chrono::NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(0, 7, 57)
            .unwrap();
        let mut record = TripRecord::new(start, "A", "B");
        record.trip_duration = Some(42.0);

        let mut out = Vec::new();
        render_rows(&[record], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "2017-01-01 00:07:57 |  | 42 | A | B |  |  | \n");
    }

    #[test]
    fn test_summary_from_report() {
        let summary = SessionSummary::from_report(&sample_report());
        assert_eq!(summary.city, "Washington");
        assert_eq!(summary.month, "3");
        assert_eq!(summary.day, "all");
        assert_eq!(summary.most_common_day.as_deref(), Some("Friday"));
        assert_eq!(summary.total_seconds, None);
        assert_eq!(summary.top_user_type.as_deref(), Some("Subscriber"));
    }

    #[test]
    fn test_append_summary_writes_header_once() {
        let path = temp_path("bikeshare_stats_test_header.csv");
        let _ = fs::remove_file(&path);

        let summary = SessionSummary::default();
        append_summary(&path, &summary).unwrap();
        append_summary(&path, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);
        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_summary_to_empty_file_writes_header() {
        let path = temp_path("bikeshare_stats_test_empty.csv");
        fs::write(&path, "").unwrap();

        append_summary(&path, &SessionSummary::default()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.lines().next().unwrap().starts_with("timestamp"));
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }
}
