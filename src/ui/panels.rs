use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::app::Session;
use crate::data::filter::{FilterAction, FilterSelection};
use crate::state::AppState;

const TITLE: &str = "Marketing team performance";

const DESCRIPTION: &str = "Performance analysis of the employees in the Marketing area \
of Socialize your Knowledge. Use the filter panel on the left to narrow the charts down.";

const CONCLUSION: &str = "Most employees hold a performance score of around 3. Female \
employees work slightly more hours on average than male employees. The largest share of \
the salary budget goes to employees between 30 and 39 years old. Finally, no employee \
working more than 4,472 hours shows a low performance score (1).";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel; widget changes become [`FilterAction`]s.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, logo: Option<&str>) {
    // ---- Logo (centered) ----
    if let Some(uri) = logo {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(uri)
                    .max_width(ui.available_width() * 0.8)
                    .max_height(120.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.heading("Filter panel");
    ui.separator();

    // Clone what we need so actions can be dispatched after the widgets.
    let genders: Vec<String> = state.table.genders.iter().cloned().collect();
    let statuses: Vec<String> = state.table.marital_statuses.iter().cloned().collect();
    let bounds = state.filters.bounds();
    let selection = state.filters.selection().clone();
    let defaults = state.filters.defaults().clone();
    let mut actions = Vec::new();

    // ---- Gender (single choice) ----
    ui.strong("Select gender:");
    if ui.radio(selection.gender.is_none(), "All").clicked() {
        actions.push(FilterAction::SetGender(None));
    }
    for gender in &genders {
        let checked = selection.gender.as_deref() == Some(gender.as_str());
        let text = RichText::new(gender).color(state.gender_colors.color_for(gender));
        if ui.radio(checked, text).clicked() && !checked {
            actions.push(FilterAction::SetGender(Some(gender.clone())));
        }
    }
    ui.label(selected_caption("Selected gender", selection.gender.as_deref()));
    ui.separator();

    // ---- Performance score range (two linked sliders) ----
    ui.strong("Select performance score range:");
    let mut lo = selection.score_range.lo();
    let mut hi = selection.score_range.hi();
    let lo_changed = ui
        .add(Slider::new(&mut lo, bounds.min..=hi).text("min"))
        .changed();
    let hi_changed = ui
        .add(Slider::new(&mut hi, lo..=bounds.max).text("max"))
        .changed();
    if lo_changed || hi_changed {
        actions.push(FilterAction::SetScoreRange { lo, hi });
    }
    ui.label(range_caption(&selection, &defaults));
    ui.separator();

    // ---- Marital status (single choice) ----
    ui.strong("Select marital status:");
    let current = selection.marital_status.clone();
    egui::ComboBox::from_id_salt("marital_status")
        .selected_text(current.as_deref().unwrap_or("All"))
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), "All").clicked() {
                actions.push(FilterAction::SetMaritalStatus(None));
            }
            for status in &statuses {
                let checked = current.as_deref() == Some(status.as_str());
                if ui.selectable_label(checked, status).clicked() {
                    actions.push(FilterAction::SetMaritalStatus(Some(status.clone())));
                }
            }
        });
    ui.label(selected_caption(
        "Selected marital status",
        selection.marital_status.as_deref(),
    ));
    ui.separator();

    if ui.button("Reset filters").clicked() {
        actions.push(FilterAction::Reset);
    }

    if let Some(msg) = &state.status_message {
        ui.label(RichText::new(msg).color(Color32::RED));
    }

    for action in actions {
        state.dispatch(action);
    }
}

fn selected_caption(label: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!("{label}: '{v}'"),
        None => format!("{label}: None"),
    }
}

/// "None" while the range still spans the whole table.
fn range_caption(selection: &FilterSelection, defaults: &FilterSelection) -> String {
    if selection.score_range == defaults.score_range {
        "Selected score range: None".to_string()
    } else {
        format!(
            "Selected score range: {} - {}",
            selection.score_range.lo(),
            selection.score_range.hi()
        )
    }
}

// ---------------------------------------------------------------------------
// Static text
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui) {
    ui.heading(RichText::new(TITLE).size(28.0).strong());
    ui.label(DESCRIPTION);
    ui.add_space(8.0);
}

pub fn conclusion(ui: &mut Ui) {
    ui.add_space(12.0);
    ui.heading("Analysis conclusion");
    ui.label(CONCLUSION);
    ui.add_space(12.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, session: &mut Session) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(session);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Session::Ready(state) = session {
            ui.label(format!(
                "{} employees loaded, {} visible",
                state.table.len(),
                state.visible_indices.len()
            ));
            ui.separator();
            ui.label(RichText::new(&state.source).weak());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Pick a local table; a successful load starts a fresh session.
pub fn open_file_dialog(session: &mut Session) {
    let file = rfd::FileDialog::new()
        .set_title("Open employee data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    let Some(path) = file else {
        return;
    };

    match crate::data::loader::load_file(&path) {
        Ok(table) => {
            log::info!("Opened {} with {} employees", path.display(), table.len());
            *session = Session::Ready(AppState::new(table, path.display().to_string()));
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            match session {
                Session::Ready(state) => state.status_message = Some(format!("Error: {e:#}")),
                Session::Failed { source, message } => {
                    *source = path.display().to_string();
                    *message = format!("{e:#}");
                }
            }
        }
    }
}
