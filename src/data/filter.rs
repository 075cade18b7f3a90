use thiserror::Error;

use super::model::{EmployeeRecord, EmployeeTable, NumericBounds};

// ---------------------------------------------------------------------------
// Filter selection: the value object the evaluator consumes
// ---------------------------------------------------------------------------

/// Closed performance-score interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    lo: f64,
    hi: f64,
}

impl ScoreRange {
    /// The full observed range of a column.
    pub fn full(bounds: NumericBounds) -> Self {
        ScoreRange {
            lo: bounds.min,
            hi: bounds.max,
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Inclusive at both ends.
    pub fn contains(&self, score: f64) -> bool {
        self.lo <= score && score <= self.hi
    }
}

/// The user's current choice for each of the three filters.
///
/// `None` for a categorical field means "no filter".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub gender: Option<String>,
    pub score_range: ScoreRange,
    pub marital_status: Option<String>,
}

impl FilterSelection {
    /// No categorical filter and the full observed score range.
    pub fn defaults_for(table: &EmployeeTable) -> Self {
        FilterSelection {
            gender: None,
            score_range: ScoreRange::full(table.score_bounds),
            marital_status: None,
        }
    }

    /// Whether a record passes every active predicate.
    pub fn matches(&self, record: &EmployeeRecord) -> bool {
        if let Some(gender) = &self.gender {
            if record.gender != *gender {
                return false;
            }
        }
        if let Some(status) = &self.marital_status {
            if record.marital_status != *status {
                return false;
            }
        }
        self.score_range.contains(record.performance_score)
    }
}

/// Return indices of employees that pass all active filters, in table order.
pub fn filtered_indices(table: &EmployeeTable, selection: &FilterSelection) -> Vec<usize> {
    table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| selection.matches(record))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Filter state machine
// ---------------------------------------------------------------------------

/// One user interaction with the filter panel.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    SetGender(Option<String>),
    SetMaritalStatus(Option<String>),
    SetScoreRange { lo: f64, hi: f64 },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("score range is inverted: {lo} > {hi}")]
    InvertedRange { lo: f64, hi: f64 },
    #[error("score range bound is not a number")]
    NotANumber,
}

/// Current selection plus the defaults it resets to.
///
/// Invariant: `lo <= hi` and both lie within the table's observed score bounds.
#[derive(Debug, Clone)]
pub struct FilterState {
    bounds: NumericBounds,
    defaults: FilterSelection,
    current: FilterSelection,
}

impl FilterState {
    /// Compute the default selection for a freshly loaded table.
    pub fn initialize(table: &EmployeeTable) -> Self {
        let defaults = FilterSelection::defaults_for(table);
        FilterState {
            bounds: table.score_bounds,
            current: defaults.clone(),
            defaults,
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.current
    }

    pub fn defaults(&self) -> &FilterSelection {
        &self.defaults
    }

    /// Observed score bounds the range is confined to.
    pub fn bounds(&self) -> NumericBounds {
        self.bounds
    }

    pub fn is_default(&self) -> bool {
        self.current == self.defaults
    }

    /// The selection `action` would produce, without committing it.
    pub fn next(&self, action: &FilterAction) -> Result<FilterSelection, FilterError> {
        let mut scratch = self.clone();
        scratch.apply(action)?;
        Ok(scratch.current)
    }

    /// Apply a user action. A rejected action leaves the selection untouched.
    pub fn apply(&mut self, action: &FilterAction) -> Result<&FilterSelection, FilterError> {
        match action {
            FilterAction::SetGender(gender) => self.set_gender(gender.clone()),
            FilterAction::SetMaritalStatus(status) => self.set_marital_status(status.clone()),
            FilterAction::SetScoreRange { lo, hi } => self.set_score_range(*lo, *hi)?,
            FilterAction::Reset => self.reset(),
        }
        log::debug!("filter {action:?} → {:?}", self.current);
        Ok(&self.current)
    }

    pub fn set_gender(&mut self, gender: Option<String>) {
        self.current.gender = gender;
    }

    pub fn set_marital_status(&mut self, status: Option<String>) {
        self.current.marital_status = status;
    }

    /// Out-of-bounds limits are clamped; NaN or inverted ranges are rejected.
    pub fn set_score_range(&mut self, lo: f64, hi: f64) -> Result<(), FilterError> {
        if lo.is_nan() || hi.is_nan() {
            return Err(FilterError::NotANumber);
        }
        if lo > hi {
            return Err(FilterError::InvertedRange { lo, hi });
        }
        self.current.score_range = ScoreRange {
            lo: self.bounds.clamp(lo),
            hi: self.bounds.clamp(hi),
        };
        Ok(())
    }

    /// Restore the defaults computed at initialisation.
    pub fn reset(&mut self) {
        self.current = self.defaults.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::employee;
    use proptest::prelude::*;

    fn scenario_table() -> EmployeeTable {
        EmployeeTable::from_records(vec![
            employee("first", "F", "Single", 3.0),
            employee("second", "M", "Married", 5.0),
            employee("third", "F", "Married", 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn gender_and_range_keep_original_order() {
        let table = scenario_table();
        let mut state = FilterState::initialize(&table);
        state.set_gender(Some("F".into()));
        state.set_score_range(1.0, 3.0).unwrap();

        let idx = filtered_indices(&table, state.selection());
        let names: Vec<_> = table.rows(&idx).map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "third"]);
    }

    #[test]
    fn defaults_select_whole_table() {
        let table = scenario_table();
        let state = FilterState::initialize(&table);
        assert!(state.is_default());
        assert_eq!(filtered_indices(&table, state.selection()), vec![0, 1, 2]);
    }

    #[test]
    fn unknown_gender_yields_empty_view() {
        let table = scenario_table();
        let mut state = FilterState::initialize(&table);
        state.set_gender(Some("X".into()));
        assert!(filtered_indices(&table, state.selection()).is_empty());
    }

    #[test]
    fn marital_status_filter_applies() {
        let table = scenario_table();
        let mut state = FilterState::initialize(&table);
        state
            .apply(&FilterAction::SetMaritalStatus(Some("Married".into())))
            .unwrap();
        assert_eq!(filtered_indices(&table, state.selection()), vec![1, 2]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let table = scenario_table();
        let mut state = FilterState::initialize(&table);
        state.set_score_range(3.0, 5.0).unwrap();
        assert_eq!(filtered_indices(&table, state.selection()), vec![0, 1]);
        state.set_score_range(3.0, 3.0).unwrap();
        assert_eq!(filtered_indices(&table, state.selection()), vec![0]);
    }

    #[test]
    fn inverted_range_is_rejected_and_state_kept() {
        let table = scenario_table();
        let mut state = FilterState::initialize(&table);
        state.set_score_range(2.0, 4.0).unwrap();
        let before = state.selection().clone();

        let err = state.set_score_range(4.0, 2.0).unwrap_err();
        assert_eq!(err, FilterError::InvertedRange { lo: 4.0, hi: 2.0 });
        assert_eq!(state.selection(), &before);

        assert_eq!(
            state.set_score_range(f64::NAN, 2.0),
            Err(FilterError::NotANumber)
        );
    }

    #[test]
    fn out_of_bounds_range_is_clamped() {
        let table = scenario_table();
        let mut state = FilterState::initialize(&table);
        state.set_score_range(-10.0, 99.0).unwrap();
        let range = state.selection().score_range;
        assert_eq!((range.lo(), range.hi()), (1.0, 5.0));

        // Entirely below the observed range collapses onto the minimum.
        state.set_score_range(-5.0, -1.0).unwrap();
        let range = state.selection().score_range;
        assert_eq!((range.lo(), range.hi()), (1.0, 1.0));
    }

    #[test]
    fn next_does_not_commit() {
        let table = scenario_table();
        let state = FilterState::initialize(&table);
        let proposed = state
            .next(&FilterAction::SetGender(Some("M".into())))
            .unwrap();
        assert_eq!(proposed.gender.as_deref(), Some("M"));
        assert!(state.is_default());
    }

    #[test]
    fn reset_action_restores_defaults() {
        let table = scenario_table();
        let mut state = FilterState::initialize(&table);
        state.apply(&FilterAction::SetGender(Some("F".into()))).unwrap();
        state
            .apply(&FilterAction::SetScoreRange { lo: 2.0, hi: 3.0 })
            .unwrap();
        state.apply(&FilterAction::Reset).unwrap();
        assert_eq!(state.selection(), FilterState::initialize(&table).selection());
    }

    fn arb_table() -> impl Strategy<Value = EmployeeTable> {
        let row = (
            prop_oneof![Just("F"), Just("M")],
            prop_oneof![Just("Single"), Just("Married"), Just("Divorced")],
            1u8..=5,
        );
        prop::collection::vec(row, 1..40).prop_map(|rows| {
            let records = rows
                .into_iter()
                .enumerate()
                .map(|(i, (g, m, s))| employee(&format!("e{i}"), g, m, f64::from(s)))
                .collect();
            EmployeeTable::from_records(records).unwrap()
        })
    }

    fn arb_category(values: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
        prop::option::of(prop::sample::select(values).prop_map(str::to_string))
    }

    proptest! {
        #[test]
        fn prop_view_is_ordered_subsequence(
            table in arb_table(),
            gender in arb_category(&["F", "M", "X"]),
            status in arb_category(&["Single", "Married"]),
            a in 0.0f64..6.0,
            b in 0.0f64..6.0,
        ) {
            let mut state = FilterState::initialize(&table);
            state.set_gender(gender);
            state.set_marital_status(status);
            state.set_score_range(a.min(b), a.max(b)).unwrap();

            let idx = filtered_indices(&table, state.selection());
            prop_assert!(idx.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(idx.iter().all(|&i| i < table.len()));
            for &i in &idx {
                prop_assert!(state.selection().matches(&table.records()[i]));
            }
            // Idempotent evaluation.
            prop_assert_eq!(&idx, &filtered_indices(&table, state.selection()));
        }

        #[test]
        fn prop_defaults_yield_full_table(table in arb_table()) {
            let state = FilterState::initialize(&table);
            let idx = filtered_indices(&table, state.selection());
            prop_assert_eq!(idx, (0..table.len()).collect::<Vec<_>>());
        }

        #[test]
        fn prop_reset_matches_fresh_state(
            table in arb_table(),
            gender in arb_category(&["F", "M"]),
            a in 0.0f64..6.0,
            b in 0.0f64..6.0,
        ) {
            let mut state = FilterState::initialize(&table);
            state.set_gender(gender);
            state.set_score_range(a.min(b), a.max(b)).unwrap();
            state.reset();
            let fresh = FilterState::initialize(&table);
            prop_assert_eq!(state.selection(), fresh.selection());
        }

        #[test]
        fn prop_range_stays_within_bounds(
            table in arb_table(),
            a in -10.0f64..10.0,
            b in -10.0f64..10.0,
        ) {
            let mut state = FilterState::initialize(&table);
            let _ = state.set_score_range(a, b);
            let range = state.selection().score_range;
            let bounds = state.bounds();
            prop_assert!(range.lo() <= range.hi());
            prop_assert!(bounds.contains(range.lo()) && bounds.contains(range.hi()));
        }
    }
}
