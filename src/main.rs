mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::{DashboardApp, Session};
use clap::Parser;
use config::Args;
use data::loader::{self, DataSource};
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    // The table is fetched once and owned by the session for its whole lifetime.
    let source = DataSource::parse(&args.source);
    let session = match loader::load(&source) {
        Ok(table) => Session::Ready(AppState::new(table, source.to_string())),
        Err(e) => {
            log::error!("Failed to load dataset from {source}: {e:#}");
            Session::Failed {
                source: source.to_string(),
                message: format!("{e:#}"),
            }
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let logo = args.logo_uri();
    eframe::run_native(
        "Employee Performance Dashboard",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the (possibly remote) logo.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DashboardApp::new(session, logo)))
        }),
    )
}
