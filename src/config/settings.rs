//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! The credential entered on the chat screen is deliberately absent here: it
//! lives in memory only and is dropped on sign-out.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::app::Screen;
use crate::chat::ModelSettings;
use crate::extract::ExtractorVariant;

// ---------------------------------------------------------------------------
// SimulationConfig
// ---------------------------------------------------------------------------

/// Fixed delays used by the simulated backends, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Delay before the canned assistant reply is appended.
    pub reply_delay_ms: u64,
    /// Delay of the simulated OCR stage (D1).
    pub extract_delay_ms: u64,
    /// Delay of the simulated spelling-correction stage (D2).
    pub correct_delay_ms: u64,
    /// How long the "Copied" indicator stays lit after a clipboard write.
    pub copied_flash_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1500,
            extract_delay_ms: 1500,
            correct_delay_ms: 1000,
            copied_flash_ms: 2000,
        }
    }
}

impl SimulationConfig {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn extract_delay(&self) -> Duration {
        Duration::from_millis(self.extract_delay_ms)
    }

    pub fn correct_delay(&self) -> Duration {
        Duration::from_millis(self.correct_delay_ms)
    }

    pub fn copied_flash(&self) -> Duration {
        Duration::from_millis(self.copied_flash_ms)
    }
}

// ---------------------------------------------------------------------------
// ExtractorConfig
// ---------------------------------------------------------------------------

/// Settings for the image-text extractor screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Which extraction pipeline the tools screen runs.
    pub variant: ExtractorVariant,
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial inner size of the main window `(width, height)` in points.
    pub window_size: (f32, f32),
    /// Screen shown when the application starts.
    pub start_screen: Screen,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (820.0, 640.0),
            start_screen: Screen::Chat,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use gemini_studio::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model settings the chat screen starts with.
    pub model: ModelSettings,
    /// Simulated backend delays.
    pub simulation: SimulationConfig,
    /// Image-text extractor settings.
    pub extractor: ExtractorConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    ///
    /// Out-of-range model settings in the file are clamped into range.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.model = config.model.clamped();
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns `true` when no `settings.toml` file exists yet.
    pub fn is_first_run() -> bool {
        !AppPaths::new().settings_file.exists()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.simulation.reply_delay_ms, 1500);
        assert_eq!(cfg.simulation.extract_delay_ms, 1500);
        assert_eq!(cfg.simulation.correct_delay_ms, 1000);
        assert_eq!(cfg.simulation.copied_flash_ms, 2000);
        assert_eq!(cfg.extractor.variant, ExtractorVariant::ExtractThenCorrect);
        assert_eq!(cfg.ui.start_screen, Screen::Chat);
        assert_eq!(cfg.model.top_k, 40);
        assert_eq!(cfg.model.max_output_tokens, 2048);
    }

    #[test]
    fn modified_values_survive_save_and_load() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.toml");

        let mut cfg = AppConfig::default();
        cfg.model.temperature = 0.2;
        cfg.model.max_output_tokens = 512;
        cfg.simulation.reply_delay_ms = 10;
        cfg.extractor.variant = ExtractorVariant::ExtractOnly;
        cfg.ui.start_screen = Screen::Tools;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[extractor]\nvariant = \"extract_only\"\n").unwrap();

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.extractor.variant, ExtractorVariant::ExtractOnly);
        assert_eq!(loaded.simulation, SimulationConfig::default());
        assert_eq!(loaded.model, ModelSettings::default());
    }

    #[test]
    fn out_of_range_model_settings_are_clamped_on_load() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[model]\ntemperature = 3.0\ntop_k = 0\ntop_p = 0.5\nmax_output_tokens = 99999\n",
        )
        .unwrap();

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.model.temperature, 1.0);
        assert_eq!(loaded.model.top_k, 1);
        assert_eq!(loaded.model.top_p, 0.5);
        assert_eq!(loaded.model.max_output_tokens, 8192);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn delay_helpers_convert_milliseconds() {
        let sim = SimulationConfig::default();
        assert_eq!(sim.reply_delay(), Duration::from_millis(1500));
        assert_eq!(sim.correct_delay(), Duration::from_millis(1000));
        assert_eq!(sim.copied_flash(), Duration::from_secs(2));
    }
}
