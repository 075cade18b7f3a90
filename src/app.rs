use eframe::egui::{self, Color32, RichText, ScrollArea};

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// A dashboard session either has its table or failed to get one.
pub enum Session {
    Ready(AppState),
    /// Loading the table failed; nothing but the error is rendered.
    Failed { source: String, message: String },
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub session: Session,
    /// Image URI for the sidebar logo.
    pub logo: Option<String>,
}

impl DashboardApp {
    pub fn new(session: Session, logo: Option<String>) -> Self {
        Self { session, logo }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.session);
        });

        let logo = self.logo.as_deref();
        match &mut self.session {
            Session::Ready(state) => {
                // ---- Left side panel: filters ----
                egui::SidePanel::left("filter_panel")
                    .default_width(260.0)
                    .resizable(true)
                    .show(ctx, |ui| {
                        panels::side_panel(ui, state, logo);
                    });

                // ---- Central panel: charts ----
                egui::CentralPanel::default().show(ctx, |ui| {
                    ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            panels::header(ui);
                            plot::score_histogram(ui, state);
                            plot::hours_by_gender(ui, state);
                            plot::age_salary_histogram(ui, state);
                            plot::hours_vs_score(ui, state);
                            panels::conclusion(ui);
                        });
                });
            }
            Session::Failed { source, message } => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.heading(RichText::new("Could not load the employee dataset").color(Color32::RED));
                        ui.label(format!("Source: {source}"));
                        ui.add_space(8.0);
                        ui.label(message.as_str());
                        ui.add_space(8.0);
                        ui.label("Open a local file with File → Open… or restart with --source.");
                    });
                });
            }
        }
    }
}
