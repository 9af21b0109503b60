use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export::EXPORT_HEADERS;
use crate::data::model::{format_optional, measured};
use crate::state::AppState;

/// Render the ranked matches as a table, best first.
pub fn matches_table(ui: &mut Ui, state: &AppState) {
    if state.matches.is_empty() {
        ui.label("No matches to show.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .column(Column::auto().at_least(30.0))
        .columns(Column::auto().at_least(70.0), EXPORT_HEADERS.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for title in EXPORT_HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (rank, m) in state.matches.iter().enumerate() {
                let r = &m.record;
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(RichText::new((rank + 1).to_string()).weak());
                    });
                    row.col(|ui| {
                        ui.label(&r.sender);
                    });
                    row.col(|ui| {
                        ui.label(&r.receiver);
                    });
                    row.col(|ui| {
                        ui.label(format_optional(measured(r.gfp)));
                    });
                    row.col(|ui| {
                        ui.label(format_optional(measured(r.mcherry)));
                    });
                    row.col(|ui| {
                        ui.label(format_optional(r.trigger_minutes));
                    });
                    row.col(|ui| {
                        ui.label(format_optional(m.diff_score));
                    });
                });
            }
        });
}
