mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::PromoterPickerApp;
use config::{CONFIG_ENV, Settings};
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let settings = Settings::load_or_default(config_path.as_deref());
    let mut state = AppState::new(settings);

    // Optional dataset path on the command line.
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.open(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Promoter Recommender Tool for QS",
        options,
        Box::new(|_cc| Ok(Box::new(PromoterPickerApp::new(state)))),
    )
}
