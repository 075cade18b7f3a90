use std::collections::BTreeSet;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Source columns kept from the raw dataset; everything else is pruned.
pub const REQUIRED_COLUMNS: [&str; 13] = [
    "name_employee",
    "performance_score",
    "salary",
    "position",
    "average_work_hours",
    "birth_date",
    "gender",
    "marital_status",
    "hiring_date",
    "satisfaction_level",
    "last_performance_date",
    "absences",
    "age",
];

/// Formats accepted for date cells, tried in order.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Parse a date cell, tolerating a trailing time component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    // "1983-10-01 00:00:00" / "1983-10-01T00:00:00" → date part only
    let date_part = raw.split([' ', 'T']).next().unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|s| {
        let parsed = parse_date(s);
        if parsed.is_none() && !s.trim().is_empty() {
            log::warn!("Unrecognised date '{s}', treating as missing");
        }
        parsed
    }))
}

// ---------------------------------------------------------------------------
// EmployeeRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single employee (one row of the source table).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "name_employee")]
    pub name: String,
    pub performance_score: f64,
    pub salary: f64,
    pub position: String,
    pub average_work_hours: f64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub birth_date: Option<NaiveDate>,
    pub gender: String,
    pub marital_status: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub hiring_date: Option<NaiveDate>,
    pub satisfaction_level: f64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_performance_date: Option<NaiveDate>,
    pub absences: f64,
    pub age: f64,
}

// ---------------------------------------------------------------------------
// NumericBounds – observed [min, max] of a column
// ---------------------------------------------------------------------------

/// Closed interval of values observed in a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBounds {
    pub min: f64,
    pub max: f64,
}

impl NumericBounds {
    /// Bounds over the finite values of `values`, `None` if there are none.
    pub fn observe(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Self>, v| match acc {
                None => Some(Self { min: v, max: v }),
                Some(b) => Some(Self {
                    min: b.min.min(v),
                    max: b.max.max(v),
                }),
            })
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

// ---------------------------------------------------------------------------
// EmployeeTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full, read-only employee table with pre-computed column indices.
#[derive(Debug, Clone)]
pub struct EmployeeTable {
    records: Vec<EmployeeRecord>,
    /// Sorted distinct genders.
    pub genders: BTreeSet<String>,
    /// Sorted distinct marital statuses.
    pub marital_statuses: BTreeSet<String>,
    /// Observed performance-score range; the default score filter.
    pub score_bounds: NumericBounds,
    /// Observed average-work-hours range; fixed axis domain for the scatter chart.
    pub hours_bounds: NumericBounds,
    /// Sorted distinct performance scores, used as an ordinal axis.
    pub score_levels: Vec<f64>,
}

impl EmployeeTable {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<EmployeeRecord>) -> Result<Self> {
        if records.is_empty() {
            bail!("Dataset contains no employee rows");
        }
        if let Some(row) = records
            .iter()
            .position(|r| !r.performance_score.is_finite())
        {
            bail!("Row {row}: performance_score is not a finite number");
        }

        let genders = records.iter().map(|r| r.gender.clone()).collect();
        let marital_statuses = records.iter().map(|r| r.marital_status.clone()).collect();

        let score_bounds = NumericBounds::observe(records.iter().map(|r| r.performance_score))
            .ok_or_else(|| anyhow::anyhow!("No performance scores to derive a range from"))?;
        // A table where every hours cell is NaN still renders, with a degenerate axis.
        let hours_bounds = NumericBounds::observe(records.iter().map(|r| r.average_work_hours))
            .unwrap_or(NumericBounds { min: 0.0, max: 0.0 });

        let mut score_levels: Vec<f64> = records.iter().map(|r| r.performance_score).collect();
        // Dedup under the same total order the lookups use, so -0.0 and 0.0 both keep a level.
        score_levels.sort_by(f64::total_cmp);
        score_levels.dedup_by(|a, b| a.total_cmp(b).is_eq());

        Ok(EmployeeTable {
            records,
            genders,
            marital_statuses,
            score_bounds,
            hours_bounds,
            score_levels,
        })
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    /// Records at the given row indices, in index order.
    pub fn rows<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a EmployeeRecord> + 'a {
        indices.iter().filter_map(|&i| self.records.get(i))
    }

    /// Position of `score` on the ordinal score axis.
    pub fn score_level_index(&self, score: f64) -> Option<usize> {
        self.score_levels
            .binary_search_by(|probe| probe.total_cmp(&score))
            .ok()
    }

    /// Number of employees.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a successfully built table.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::employee;

    #[test]
    fn parse_date_accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(1983, 10, 1);
        assert_eq!(parse_date("1983-10-01"), expected);
        assert_eq!(parse_date("10/1/1983"), expected);
        assert_eq!(parse_date("01-10-1983"), expected);
        assert_eq!(parse_date("1983-10-01 00:00:00"), expected);
        assert_eq!(parse_date("1983-10-01T08:30:00"), expected);
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn bounds_ignore_non_finite_values() {
        let b = NumericBounds::observe([3.0, f64::NAN, 1.0, 4.0]).unwrap();
        assert_eq!(b, NumericBounds { min: 1.0, max: 4.0 });
        assert!(NumericBounds::observe([f64::NAN]).is_none());
        assert_eq!(b.clamp(9.0), 4.0);
        assert!(b.contains(1.0) && b.contains(4.0) && !b.contains(0.5));
    }

    #[test]
    fn table_indices_are_computed_on_load() {
        let table = EmployeeTable::from_records(vec![
            employee("Ana", "F", "Single", 3.0),
            employee("Luis", "M", "Married", 1.0),
            employee("Eva", "F", "Married", 4.0),
            employee("Raul", "M", "Single", 3.0),
        ])
        .unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(
            table.genders.iter().collect::<Vec<_>>(),
            vec!["F", "M"]
        );
        assert_eq!(table.marital_statuses.len(), 2);
        assert_eq!(table.score_bounds, NumericBounds { min: 1.0, max: 4.0 });
        assert_eq!(table.score_levels, vec![1.0, 3.0, 4.0]);
        assert_eq!(table.score_level_index(3.0), Some(1));
        assert_eq!(table.score_level_index(2.0), None);
    }

    #[test]
    fn hours_bounds_span_whole_table() {
        let hours = [4_120.5, 4_800.0, 3_950.25, 4_472.0];
        let records = hours
            .iter()
            .enumerate()
            .map(|(i, &h)| {
                let mut rec = employee(&format!("e{i}"), "F", "Single", 3.0);
                rec.average_work_hours = h;
                rec
            })
            .collect();
        let table = EmployeeTable::from_records(records).unwrap();
        assert_eq!(
            table.hours_bounds,
            NumericBounds {
                min: 3_950.25,
                max: 4_800.0
            }
        );
    }

    #[test]
    fn all_nan_hours_fall_back_to_degenerate_bounds() {
        let mut rec = employee("X", "F", "Single", 2.0);
        rec.average_work_hours = f64::NAN;
        let table = EmployeeTable::from_records(vec![rec]).unwrap();
        assert_eq!(table.hours_bounds, NumericBounds { min: 0.0, max: 0.0 });
    }

    #[test]
    fn signed_zero_scores_each_keep_a_level() {
        let table = EmployeeTable::from_records(vec![
            employee("neg", "F", "Single", -0.0),
            employee("pos", "M", "Single", 0.0),
            employee("one", "M", "Single", 1.0),
        ])
        .unwrap();
        assert_eq!(table.score_levels.len(), 3);
        for rec in table.records() {
            assert!(
                table.score_level_index(rec.performance_score).is_some(),
                "{} has no level",
                rec.name
            );
        }
    }

    #[test]
    fn rows_follow_index_order() {
        let table = EmployeeTable::from_records(vec![
            employee("A", "F", "Single", 1.0),
            employee("B", "M", "Single", 2.0),
            employee("C", "F", "Single", 3.0),
        ])
        .unwrap();
        let names: Vec<_> = table.rows(&[0, 2]).map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(EmployeeTable::from_records(Vec::new()).is_err());
    }

    #[test]
    fn non_finite_score_is_rejected() {
        let mut bad = employee("X", "F", "Single", 1.0);
        bad.performance_score = f64::NAN;
        let err = EmployeeTable::from_records(vec![bad]).unwrap_err();
        assert!(err.to_string().contains("performance_score"));
    }
}
