use eframe::egui::{self, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PromoterPickerApp {
    pub state: AppState,
}

impl PromoterPickerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PromoterPickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: target inputs ----
        egui::SidePanel::left("target_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table + charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.cache.source().is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a dataset to rank promoter combinations  (File → Open…)");
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading("Top Matching Promoter Combinations");
                    table::matches_table(ui, &self.state);
                    ui.separator();

                    ui.heading(format!("Top {} Combinations by Score", self.state.top_n));
                    plot::score_bar_chart(ui, &self.state, 320.0);
                    ui.separator();

                    ui.heading("3D Expression Profile (GFP, mCherry, Time)");
                    plot::expression_projection(ui, &mut self.state, 420.0);
                });
        });
    }
}
