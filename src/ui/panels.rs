use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::config::MAX_TOP_N;
use crate::data::export::export_csv;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – target inputs
// ---------------------------------------------------------------------------

/// Render the left panel with the desired expression inputs.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Desired Expression");
    ui.separator();

    let mut target = state.target;
    let [gfp_lo, gfp_hi] = state.settings.gfp_range;
    let [mch_lo, mch_hi] = state.settings.mcherry_range;
    let [t_lo, t_hi] = state.settings.trigger_range;

    egui::Grid::new("target_inputs")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Desired GFP");
            ui.add(
                egui::DragValue::new(&mut target.desired_gfp)
                    .range(gfp_lo..=gfp_hi)
                    .speed(0.01)
                    .fixed_decimals(2),
            );
            ui.end_row();

            ui.label("Desired mCherry");
            ui.add(
                egui::DragValue::new(&mut target.desired_mcherry)
                    .range(mch_lo..=mch_hi)
                    .speed(0.01)
                    .fixed_decimals(2),
            );
            ui.end_row();

            ui.label("Trigger Time (min)");
            ui.add(
                egui::DragValue::new(&mut target.desired_trigger_minutes)
                    .range(t_lo..=t_hi)
                    .speed(1.0)
                    .fixed_decimals(1),
            );
            ui.end_row();
        });
    state.set_target(target);

    ui.add_space(8.0);
    let mut top_n = state.top_n;
    ui.add(egui::Slider::new(&mut top_n, 1..=MAX_TOP_N).text("Top N"));
    state.set_top_n(top_n);

    ui.add_space(8.0);
    if ui.button("Reset to defaults").clicked() {
        state.reset_target();
    }

    ui.separator();
    ui.label(
        RichText::new(format!(
            "score = |ΔGFP| + |ΔmCherry| + |Δtime| / {}",
            state.score_config.time_scale_divisor
        ))
        .small()
        .weak(),
    );
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open CSV folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            let loaded = state.cache.source().is_some();
            if ui.add_enabled(loaded, egui::Button::new("Reload")).clicked() {
                state.reload();
                ui.close_menu();
            }
            if ui.add_enabled(loaded, egui::Button::new("Close")).clicked() {
                state.close();
                ui.close_menu();
            }
            let has_matches = !state.matches.is_empty();
            if ui
                .add_enabled(has_matches, egui::Button::new("Export top matches…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(path) = state.cache.source() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            ui.label(format!(
                "{name}: {} combinations, showing {}",
                state.table_len(),
                state.matches.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open promoter dataset")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "ods", "json"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open folder with GFP / mcherry / time CSV files")
        .pick_folder();

    if let Some(path) = folder {
        state.open(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file: Option<PathBuf> = rfd::FileDialog::new()
        .set_title("Export top matches")
        .set_file_name("top_matches.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = export_csv(&path, &state.matches) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
