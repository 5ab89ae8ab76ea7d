//! Descriptive statistics over a filtered trip table.
//!
//! Each module reads the table it is given and returns its own result, so one
//! failing computation (e.g. `NoData` after an over-narrow filter) does not
//! stop the others from being reported.

pub mod duration;
pub mod station;
pub mod time;
pub mod user;

pub use duration::{DurationStats, duration_stats};
pub use station::{PAIR_SEPARATOR, StationStats, station_stats};
pub use time::{TimeStats, time_stats};
pub use user::{BirthYearSummary, ColumnSummary, UserStats, user_stats};
