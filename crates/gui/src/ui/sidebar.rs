//! Sidebar: local file, upload, server file list and load timing.

use egui::{Color32, RichText, Ui};

use stlview_gui_lib::state::{LoadPhase, UploadStatus, ViewerState};

use crate::i18n::t;

/// User intent collected from the sidebar this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    OpenLocal,
    Upload,
    Select(usize),
    Close,
    SwitchLanguage,
}

fn section(ui: &mut Ui, title: &str, add: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style())
        .fill(Color32::from_white_alpha(10))
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.weak(title);
            ui.add_space(4.0);
            add(ui);
        });
}

pub fn show(ui: &mut Ui, state: &ViewerState) -> Option<SidebarAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(t("app.title"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("×").on_hover_text(t("side.toggle")).clicked() {
                action = Some(SidebarAction::Close);
            }
            if ui.small_button(t("side.language")).clicked() {
                action = Some(SidebarAction::SwitchLanguage);
            }
        });
    });
    ui.add_space(8.0);

    section(ui, t("side.local"), |ui| {
        let button = egui::Button::new(RichText::new(t("side.view_local")).color(Color32::WHITE))
            .fill(Color32::from_rgb(37, 99, 235));
        if ui.add_sized([ui.available_width(), 28.0], button).clicked() {
            action = Some(SidebarAction::OpenLocal);
        }
    });
    ui.add_space(6.0);

    section(ui, t("side.upload"), |ui| {
        let in_flight = matches!(state.upload, UploadStatus::InFlight { .. });
        let button = egui::Button::new(RichText::new(t("side.upload_files")).color(Color32::WHITE))
            .fill(Color32::from_rgb(22, 163, 74));
        if ui
            .add_enabled_ui(!in_flight, |ui| ui.add_sized([ui.available_width(), 28.0], button))
            .inner
            .clicked()
        {
            action = Some(SidebarAction::Upload);
        }
        match &state.upload {
            UploadStatus::Idle => {}
            UploadStatus::InFlight { files } => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak(format!("{} ({files})", t("upload.in_flight")));
                });
            }
            UploadStatus::Done { files } => {
                ui.weak(format!("{}: {files}", t("upload.done")));
            }
            UploadStatus::Failed => {
                ui.colored_label(Color32::from_rgb(248, 113, 113), t("upload.failed"));
            }
        }
    });
    ui.add_space(6.0);

    section(ui, t("side.server_files"), |ui| {
        let records = state.catalog.current();
        if records.is_empty() {
            ui.label(RichText::new(t("side.no_files")).italics().weak());
            return;
        }
        let active = state.selection.active_source().map(|s| s.as_str());
        egui::ScrollArea::vertical()
            .id_salt("server_files_scroll")
            .max_height((ui.available_height() - 110.0).max(80.0))
            .show(ui, |ui| {
                for (index, record) in records.iter().enumerate() {
                    let selected = active == Some(record.url.as_str());
                    let label = ui
                        .selectable_label(selected, record.name.as_str())
                        .on_hover_text(format!("{} · {} KB", record.name, record.size / 1024));
                    if label.clicked() {
                        action = Some(SidebarAction::Select(index));
                    }
                }
            });
    });

    if let Some(ms) = state.selection.duration_ms() {
        ui.add_space(6.0);
        section(ui, t("side.performance"), |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{}:", t("side.load_time")));
                ui.label(
                    RichText::new(format!("{ms:.2} ms"))
                        .strong()
                        .color(Color32::from_rgb(74, 222, 128)),
                );
            });
        });
    } else if let LoadPhase::Failed(message) = state.selection.phase() {
        ui.add_space(6.0);
        ui.colored_label(Color32::from_rgb(248, 113, 113), t("view.failed"))
            .on_hover_text(message.as_str());
    }

    action
}
