#![deny(missing_docs)]

//! Entry point for the egui-based StockLens UI.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use eframe::egui;
use stocklens::config;
use stocklens::logging;
use stocklens::ui::StockLensApp;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let settings = match config::load_or_default() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("Falling back to default settings: {err}");
            config::Settings::default()
        }
    };
    tracing::info!("Inventory server at {}", settings.api.base_url);

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([960.0, 640.0])
        .with_min_inner_size([640.0, 480.0]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "AI Parts App",
        native_options,
        Box::new(move |_cc| Ok(Box::new(StockLensApp::new(settings)))),
    )?;
    Ok(())
}
