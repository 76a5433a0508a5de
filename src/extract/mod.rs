//! Image-to-text extraction tool.
//!
//! This module provides:
//! * [`ImageTextExtractor`] — state container driving OCR → correction → copy.
//! * [`ExtractionState`] / [`ExtractionStatus`] — what the tools screen renders.
//! * [`OcrEngine`] / [`SpellCorrector`] — async stage traits, with simulated
//!   implementations selected by [`ExtractorVariant`].
//! * [`ClipboardBackend`] / [`SystemClipboard`] — clipboard read/write via `arboard`.
//! * [`ImageHandle`] — opaque handle to a selected or pasted image.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gemini_studio::config::AppConfig;
//! use gemini_studio::extract::{ImageHandle, ImageTextExtractor, SystemClipboard};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let mut extractor = ImageTextExtractor::from_config(
//!         &config,
//!         Arc::new(SystemClipboard),
//!         tokio::runtime::Handle::current(),
//!     );
//!
//!     extractor.set_image(ImageHandle::from_bytes("scan.png", "image/png", vec![]));
//!     extractor.extract().unwrap();
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//!     extractor.poll();
//!     println!("{}", extractor.state().final_text());
//! }
//! ```

pub mod clipboard;
pub mod engine;
pub mod extractor;
pub mod image;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use clipboard::{paste_image, ClipboardBackend, ClipboardError, ClipboardItem, SystemClipboard};
pub use engine::{
    ExtractorStages, ExtractorVariant, OcrEngine, SimulatedCorrector, SimulatedOcr, SpellCorrector,
    CORRECTED_SAMPLE, MISSPELLED_SAMPLE, VIETNAMESE_SAMPLE,
};
pub use extractor::{ExtractError, ImageTextExtractor, EXTRACTION_FAILED};
pub use image::{mime_for_path, ImageError, ImageHandle};
pub use state::{ExtractionState, ExtractionStatus};
