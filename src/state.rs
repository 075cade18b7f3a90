use crate::color::ColorMap;
use crate::data::filter::{FilterAction, FilterState, filtered_indices};
use crate::data::model::{EmployeeRecord, EmployeeTable};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One dashboard session: the loaded table and the user's filter selection.
pub struct AppState {
    /// Employee table, loaded once at session start.
    pub table: EmployeeTable,

    /// Where the table was loaded from (shown in the top bar).
    pub source: String,

    /// Current selection and its defaults.
    pub filters: FilterState,

    /// Indices of employees passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Per-gender colours, fixed for the session.
    pub gender_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start a session over a freshly loaded table with default filters.
    pub fn new(table: EmployeeTable, source: impl Into<String>) -> Self {
        let filters = FilterState::initialize(&table);
        let visible_indices = filtered_indices(&table, filters.selection());
        let gender_colors = ColorMap::new(&table.genders);
        Self {
            table,
            source: source.into(),
            filters,
            visible_indices,
            gender_colors,
            status_message: None,
        }
    }

    /// Apply one filter action and recompute the view.
    pub fn dispatch(&mut self, action: FilterAction) {
        match self.filters.apply(&action) {
            Ok(_) => self.status_message = None,
            Err(e) => {
                log::warn!("Rejected filter action {action:?}: {e}");
                self.status_message = Some(format!("Invalid filter: {e}"));
            }
        }
        self.refilter();
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.table, self.filters.selection());
        log::debug!(
            "{} of {} employees visible",
            self.visible_indices.len(),
            self.table.len()
        );
    }

    /// Records of the current filtered view, in table order.
    pub fn visible_records(&self) -> impl Iterator<Item = &EmployeeRecord> + '_ {
        self.table.rows(&self.visible_indices)
    }
}
