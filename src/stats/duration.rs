use serde::Serialize;

use crate::error::{BikeshareError, Result};
use crate::loader::TRIP_DURATION;
use crate::table::TripTable;

/// Total and mean travel time in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_seconds: f64,
    pub mean_seconds: f64,
}

/// Sums trip durations as given; values are not cleaned, so negatives pass
/// through. A missing or non-finite duration is `InvalidData`.
pub fn duration_stats(table: &TripTable) -> Result<DurationStats> {
    if table.is_empty() {
        return Err(BikeshareError::NoData("trip duration stats"));
    }

    let mut total = 0.0;
    for (row, record) in table.records().iter().enumerate() {
        match record.trip_duration {
            Some(d) if d.is_finite() => total += d,
            _ => {
                return Err(BikeshareError::InvalidData {
                    row,
                    column: TRIP_DURATION,
                });
            }
        }
    }

    Ok(DurationStats {
        total_seconds: total,
        mean_seconds: total / table.len() as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn table(durations: &[Option<f64>]) -> TripTable {
        let start = NaiveDate::from_ymd_opt(2017, 5, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let records = durations
            .iter()
            .map(|d| {
                let mut r = TripRecord::new(start, "A", "B");
                r.trip_duration = *d;
                r
            })
            .collect();
        TripTable::new(Schema::default(), records)
    }

    #[test]
    fn test_total_and_mean() {
        let stats = duration_stats(&table(&[Some(10.0), Some(20.0), Some(30.0)])).unwrap();
        assert_eq!(stats.total_seconds, 60.0);
        assert_eq!(stats.mean_seconds, 20.0);
    }

    #[test]
    fn test_negative_values_propagate() {
        let stats = duration_stats(&table(&[Some(-10.0), Some(30.0)])).unwrap();
        assert_eq!(stats.total_seconds, 20.0);
        assert_eq!(stats.mean_seconds, 10.0);
    }

    #[test]
    fn test_missing_value_is_invalid_data() {
        let result = duration_stats(&table(&[Some(10.0), None]));
        assert!(matches!(
            result,
            Err(BikeshareError::InvalidData { row: 1, .. })
        ));
    }

    #[test]
    fn test_nan_is_invalid_data() {
        let result = duration_stats(&table(&[Some(f64::NAN)]));
        assert!(matches!(result, Err(BikeshareError::InvalidData { .. })));
    }

    #[test]
    fn test_empty_table_is_no_data() {
        let result = duration_stats(&TripTable::default());
        assert!(matches!(result, Err(BikeshareError::NoData(_))));
    }
}
