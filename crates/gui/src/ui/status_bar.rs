use egui::Ui;

use stlview_gui_lib::state::{LoadPhase, SourceKind, ViewerState};

use crate::i18n::t;

pub fn show(ui: &mut Ui, state: &ViewerState, server_url: &str) {
    ui.horizontal(|ui| {
        let file_count = state.catalog.current().len();
        ui.weak(format!("{}: {file_count}", t("status.files")));

        ui.separator();

        match state.selection.active() {
            Some(active) => {
                let origin = match active.kind {
                    SourceKind::Remote => t("status.remote"),
                    SourceKind::Local => t("status.local"),
                };
                let phase = match state.selection.phase() {
                    LoadPhase::Loading => t("view.loading"),
                    LoadPhase::Failed(_) => t("view.failed"),
                    LoadPhase::Idle | LoadPhase::Loaded => "",
                };
                ui.label(format!("{} [{origin}] {phase}", active.source));
            }
            None => {
                ui.weak(t("status.ready"));
            }
        }

        if state.catalog.is_refreshing() {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(255, 200, 100), t("status.refreshing"));
        }

        // Right-aligned server address
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(server_url);
        });
    });
}
