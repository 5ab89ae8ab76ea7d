use chrono::Weekday;
use serde::Serialize;

use crate::error::{BikeshareError, Result};
use crate::mode::mode;
use crate::table::TripTable;

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub most_common_month: u32,
    pub most_common_day: Weekday,
    pub most_common_hour: u32,
}

/// Computes the busiest month, weekday and start hour.
///
/// The start hour is derived here from each record's start time.
pub fn time_stats(table: &TripTable) -> Result<TimeStats> {
    let records = table.records();
    let no_data = || BikeshareError::NoData("time stats");

    let month = mode(records.iter().map(|r| r.month)).ok_or_else(no_data)?;
    let day = mode(records.iter().map(|r| r.day_of_week)).ok_or_else(no_data)?;
    let hour = mode(records.iter().map(|r| r.hour())).ok_or_else(no_data)?;

    Ok(TimeStats {
        most_common_month: month.value,
        most_common_day: day.value,
        most_common_hour: hour.value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Schema, TripRecord};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, m, d)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    fn table(times: &[NaiveDateTime]) -> TripTable {
        let records = times
            .iter()
            .map(|t| TripRecord::new(*t, "A", "B"))
            .collect();
        TripTable::new(Schema::default(), records)
    }

    #[test]
    fn test_time_stats() {
        // Jan 2 Mon, Mar 7 Tue, Mar 8 Wed, Mar 14 Tue
        let t = table(&[at(1, 2, 8), at(3, 7, 17), at(3, 8, 17), at(3, 14, 8)]);
        let stats = time_stats(&t).unwrap();

        assert_eq!(stats.most_common_month, 3);
        assert_eq!(stats.most_common_day, Weekday::Tue);
        // 8 and 17 both occur twice; 8 appears first
        assert_eq!(stats.most_common_hour, 8);
    }

    #[test]
    fn test_tie_break_follows_table_order() {
        // Feb 6 Mon, Jan 3 Tue: one trip in each month, day and hour
        let stats = time_stats(&table(&[at(2, 6, 23), at(1, 3, 0)])).unwrap();
        assert_eq!(stats.most_common_month, 2);
        assert_eq!(stats.most_common_day, Weekday::Mon);
        assert_eq!(stats.most_common_hour, 23);

        let stats = time_stats(&table(&[at(1, 3, 0), at(2, 6, 23)])).unwrap();
        assert_eq!(stats.most_common_month, 1);
        assert_eq!(stats.most_common_day, Weekday::Tue);
        assert_eq!(stats.most_common_hour, 0);
    }

    #[test]
    fn test_empty_table_is_no_data() {
        let result = time_stats(&TripTable::default());
        assert!(matches!(result, Err(BikeshareError::NoData(_))));
    }

    #[test]
    fn test_input_table_unchanged() {
        let t = table(&[at(1, 2, 8), at(3, 7, 17)]);
        let before = t.clone();
        time_stats(&t).unwrap();
        assert_eq!(t, before);
    }
}
