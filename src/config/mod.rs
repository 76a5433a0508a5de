//! Configuration module for Gemini Studio.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the simulated
//! pipelines and the window, `AppPaths` for the cross-platform config
//! directory, and TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, ExtractorConfig, SimulationConfig, UiConfig};
