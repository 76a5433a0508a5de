//! Application entry point — Gemini Studio.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run, and writes
//!    the defaults out so they can be edited).
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers) the simulated
//!    backends run on.
//! 4. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use eframe::egui;
use gemini_studio::{app::StudioApp, config::AppConfig};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let vp = egui::ViewportBuilder::default()
        .with_title("Gemini Studio")
        .with_inner_size([width, height])
        .with_min_inner_size([480.0, 400.0])
        .with_drag_and_drop(true);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Gemini Studio starting up");

    // 2. Configuration
    let first_run = AppConfig::is_first_run();
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if first_run {
        if let Err(e) = config.save() {
            log::warn!("Could not write default config: {e}");
        }
    }
    log::info!(
        "Extractor variant: {:?}, reply delay: {} ms",
        config.extractor.variant,
        config.simulation.reply_delay_ms
    );

    // 3. Tokio runtime — the UI thread only spawns onto it via its Handle.
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Build the egui app and run it (blocks until the window is closed)
    let app = StudioApp::new(config.clone(), rt.handle().clone());
    let options = native_options(&config);

    eframe::run_native(
        "Gemini Studio",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
