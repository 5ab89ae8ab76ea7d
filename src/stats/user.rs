use serde::Serialize;

use crate::error::{BikeshareError, Result};
use crate::mode::{Counted, mode, value_counts};
use crate::table::TripTable;

/// Outcome for a column that only some cities publish.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "summary", rename_all = "snake_case")]
pub enum ColumnSummary<T> {
    Present(T),
    /// The city's dataset has no such column.
    Absent,
    /// The column exists but no row in this table has a value.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearSummary {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Rider demographics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<Counted<String>>,
    pub genders: ColumnSummary<Vec<Counted<String>>>,
    pub birth_years: ColumnSummary<BirthYearSummary>,
}

/// Counts user types and, where the dataset has them, genders and birth years.
///
/// Blank cells are left out of every count, as are rows without a birth year.
pub fn user_stats(table: &TripTable) -> Result<UserStats> {
    if table.is_empty() {
        return Err(BikeshareError::NoData("user stats"));
    }

    let records = table.records();
    let schema = table.schema();

    let user_types = value_counts(records.iter().filter_map(|r| r.user_type.clone()));

    let genders = if schema.has_gender {
        let counts = value_counts(records.iter().filter_map(|r| r.gender.clone()));
        if counts.is_empty() {
            ColumnSummary::Empty
        } else {
            ColumnSummary::Present(counts)
        }
    } else {
        ColumnSummary::Absent
    };

    let birth_years = if schema.has_birth_year {
        let years: Vec<i32> = records.iter().filter_map(|r| r.birth_year).collect();
        summarize_birth_years(&years).map_or(ColumnSummary::Empty, ColumnSummary::Present)
    } else {
        ColumnSummary::Absent
    };

    Ok(UserStats {
        user_types,
        genders,
        birth_years,
    })
}

fn summarize_birth_years(years: &[i32]) -> Option<BirthYearSummary> {
    Some(BirthYearSummary {
        earliest: *years.iter().min()?,
        most_recent: *years.iter().max()?,
        most_common: mode(years.iter().copied())?.value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn rider(user_type: Option<&str>, gender: Option<&str>, birth_year: Option<i32>) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2017, 2, 14)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        let mut r = TripRecord::new(start, "A", "B");
        r.user_type = user_type.map(str::to_string);
        r.gender = gender.map(str::to_string);
        r.birth_year = birth_year;
        r
    }

    fn full_schema() -> Schema {
        Schema {
            has_gender: true,
            has_birth_year: true,
        }
    }

    #[test]
    fn test_user_stats_with_all_columns() {
        let t = TripTable::new(
            full_schema(),
            vec![
                rider(Some("Customer"), Some("Female"), Some(1985)),
                rider(Some("Subscriber"), Some("Male"), Some(1992)),
                rider(Some("Subscriber"), Some("Male"), Some(1960)),
                rider(None, None, Some(1992)),
                rider(Some("Subscriber"), Some("Female"), None),
            ],
        );
        let stats = user_stats(&t).unwrap();

        assert_eq!(
            stats.user_types,
            vec![
                Counted {
                    value: "Subscriber".to_string(),
                    count: 3
                },
                Counted {
                    value: "Customer".to_string(),
                    count: 1
                },
            ]
        );

        match stats.genders {
            ColumnSummary::Present(counts) => {
                let order: Vec<_> = counts.iter().map(|c| (c.value.as_str(), c.count)).collect();
                assert_eq!(order, vec![("Female", 2), ("Male", 2)]);
            }
            other => panic!("expected gender counts, got {other:?}"),
        }

        assert_eq!(
            stats.birth_years,
            ColumnSummary::Present(BirthYearSummary {
                earliest: 1960,
                most_recent: 1992,
                most_common: 1992,
            })
        );
    }

    #[test]
    fn test_missing_columns_are_reported_not_errors() {
        let t = TripTable::new(
            Schema::default(),
            vec![rider(Some("Subscriber"), None, None)],
        );
        let stats = user_stats(&t).unwrap();

        assert_eq!(stats.genders, ColumnSummary::Absent);
        assert_eq!(stats.birth_years, ColumnSummary::Absent);
        assert_eq!(stats.user_types.len(), 1);
    }

    #[test]
    fn test_column_present_but_blank() {
        let t = TripTable::new(full_schema(), vec![rider(Some("Customer"), None, None)]);
        let stats = user_stats(&t).unwrap();

        assert_eq!(stats.genders, ColumnSummary::Empty);
        assert_eq!(stats.birth_years, ColumnSummary::Empty);
    }

    #[test]
    fn test_birth_year_tie_goes_to_first_seen() {
        let t = TripTable::new(
            full_schema(),
            vec![
                rider(Some("Subscriber"), None, Some(1990)),
                rider(Some("Subscriber"), None, Some(1980)),
                rider(Some("Subscriber"), None, Some(1980)),
                rider(Some("Subscriber"), None, Some(1990)),
            ],
        );
        match user_stats(&t).unwrap().birth_years {
            ColumnSummary::Present(summary) => assert_eq!(summary.most_common, 1990),
            other => panic!("expected birth years, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_is_no_data() {
        let result = user_stats(&TripTable::new(full_schema(), vec![]));
        assert!(matches!(result, Err(BikeshareError::NoData(_))));
    }
}
