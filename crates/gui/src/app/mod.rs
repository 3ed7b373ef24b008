//! Main application module

mod styles;

use eframe::egui;

use stlview_gui_lib::api::ApiClient;
use stlview_gui_lib::state::{ClientSettings, LoadPhase, SourceRef, ViewerState};
use stlview_gui_lib::tasks::{apply_event, TaskRunner};
use stlview_gui_lib::viewport::ViewportPanel;

use crate::i18n::{lang, set_lang, t, Lang};
use crate::ui::sidebar::{self, SidebarAction};
use crate::ui::status_bar;

const SIDEBAR_WIDTH: f32 = 300.0;

/// Main application
pub struct ViewerApp {
    state: ViewerState,
    settings: ClientSettings,
    tasks: TaskRunner,
    viewport: ViewportPanel,
}

impl ViewerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: ClientSettings,
        initial_width: f32,
    ) -> std::io::Result<Self> {
        set_lang(if settings.ui.english { Lang::En } else { Lang::Ru });
        styles::configure_styles(&cc.egui_ctx, settings.ui.font_size);

        let mut tasks = TaskRunner::new(ApiClient::new(&settings.server_url))?;
        let ctx = cc.egui_ctx.clone();
        tasks.set_waker(move || ctx.request_repaint());

        let mut state = ViewerState::new(initial_width);
        tasks.refresh_catalog(state.catalog.begin_refresh());
        tracing::info!("Viewer started against {}", settings.server_url);

        Ok(Self {
            state,
            settings,
            tasks,
            viewport: ViewportPanel::new(),
        })
    }

    fn drain_events(&mut self) {
        for event in self.tasks.poll() {
            let followup = apply_event(&mut self.state, event);
            if followup.refresh_catalog {
                self.refresh_catalog();
            }
            if let Some(source) = followup.load {
                self.tasks.load(&self.state, &source);
            }
        }
    }

    fn refresh_catalog(&mut self) {
        let ticket = self.state.catalog.begin_refresh();
        self.tasks.refresh_catalog(ticket);
    }

    fn handle_action(&mut self, action: SidebarAction) {
        match action {
            SidebarAction::OpenLocal => {
                if let Some(path) = rfd::FileDialog::new()
                    .set_title(t("dlg.open_stl"))
                    .add_filter("STL", &["stl", "STL"])
                    .pick_file()
                {
                    self.tasks.read_local(path);
                }
            }
            SidebarAction::Upload => {
                if let Some(paths) = rfd::FileDialog::new()
                    .set_title(t("dlg.upload_stl"))
                    .add_filter("STL", &["stl", "STL"])
                    .pick_files()
                {
                    if !paths.is_empty() {
                        self.state.upload_started(paths.len());
                        self.tasks.upload(paths);
                    }
                }
            }
            SidebarAction::Select(index) => {
                if let Some(record) = self.state.select_catalog_entry(index) {
                    self.tasks.load(&self.state, &SourceRef::new(record.url));
                }
            }
            SidebarAction::Close => self.state.layout.toggle(),
            SidebarAction::SwitchLanguage => {
                let english = lang() != Lang::En;
                set_lang(if english { Lang::En } else { Lang::Ru });
                self.settings.ui.english = english;
                self.settings.save();
            }
        }
    }

    fn placeholder(&self) -> &'static str {
        match self.state.selection.phase() {
            LoadPhase::Idle => t("view.empty"),
            LoadPhase::Loading | LoadPhase::Loaded => t("view.loading"),
            LoadPhase::Failed(_) => t("view.failed"),
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.state.layout.on_viewport_width(ctx.screen_rect().width());

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state, &self.settings.server_url);
            });

        // ── Left panel: Sidebar ──────────────────────────────
        let mut action = None;
        if self.state.layout.sidebar_open() {
            egui::SidePanel::left("sidebar")
                .exact_width(SIDEBAR_WIDTH.min(ctx.screen_rect().width()))
                .resizable(false)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(16)),
                )
                .show(ctx, |ui| {
                    action = sidebar::show(ui, &self.state);
                });
        }

        // ── Central panel: render surface ────────────────────
        let placeholder = self.placeholder();
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, self.state.displayed(), placeholder);
            });

        // ── Floating menu button when the sidebar is hidden ──
        if !self.state.layout.sidebar_open() {
            egui::Area::new(egui::Id::new("sidebar_toggle"))
                .order(egui::Order::Foreground)
                .fixed_pos(egui::pos2(16.0, 16.0))
                .show(ctx, |ui| {
                    let button = egui::Button::new(egui::RichText::new("☰").size(18.0))
                        .min_size(egui::vec2(40.0, 40.0));
                    if ui.add(button).on_hover_text(t("side.toggle")).clicked() {
                        self.state.layout.toggle();
                    }
                });
        }

        if let Some(action) = action {
            self.handle_action(action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.release_all();
    }
}
