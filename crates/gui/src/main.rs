mod app;
pub mod i18n;
mod ui;

use app::ViewerApp;
use stlview_gui_lib::state::ClientSettings;

const INITIAL_SIZE: [f32; 2] = [1280.0, 800.0];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stlview_gui=info,stlview_gui_lib=info".into()),
        )
        .init();

    let settings = ClientSettings::load();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("STL Viewer")
            .with_inner_size(INITIAL_SIZE)
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "stlview-gui",
        native_options,
        Box::new(move |cc| {
            let app = ViewerApp::new(cc, settings, INITIAL_SIZE[0])?;
            Ok(Box::new(app))
        }),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}
