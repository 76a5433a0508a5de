//! OCR and spelling-correction stages.
//!
//! [`OcrEngine`] and [`SpellCorrector`] are the seams where a real text
//! recogniser and a real language-model corrector would plug in.  The shipped
//! implementations, [`SimulatedOcr`] and [`SimulatedCorrector`], wait a fixed
//! delay and return canned samples.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::ProcessingError;
use crate::extract::ImageHandle;

/// Simulated OCR output with deliberate misspellings.
pub const MISSPELLED_SAMPLE: &str = "This is a simulated textt extractiion from an image. \
     It contaiins some speling errors that would be corrected by the Gemini API.";

/// [`MISSPELLED_SAMPLE`] after simulated correction.
pub const CORRECTED_SAMPLE: &str = "This is a simulated text extraction from an image. \
     It contains some spelling errors that would be corrected by the Gemini API.";

/// Simulated OCR output for the extract-only pipeline.
pub const VIETNAMESE_SAMPLE: &str = "Đây là văn bản mô phỏng được trích xuất từ hình ảnh. \
     Trong thực tế, nội dung này sẽ được nhận dạng bằng công nghệ OCR.";

// ---------------------------------------------------------------------------
// ExtractorVariant
// ---------------------------------------------------------------------------

/// Which extraction pipeline the tools screen runs.
///
/// | Variant              | Stages                       | Sample     |
/// |----------------------|------------------------------|------------|
/// | `ExtractThenCorrect` | OCR → correction → copy      | English    |
/// | `ExtractOnly`        | OCR → copy                   | Vietnamese |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorVariant {
    #[default]
    ExtractThenCorrect,
    ExtractOnly,
}

impl ExtractorVariant {
    /// Caption for the trigger button.
    pub fn action_label(&self) -> &'static str {
        match self {
            ExtractorVariant::ExtractThenCorrect => "Extract & Correct Text",
            ExtractorVariant::ExtractOnly => "Extract Text",
        }
    }
}

// ---------------------------------------------------------------------------
// Stage traits
// ---------------------------------------------------------------------------

/// Turns an image into text.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn extract(&self, image: &ImageHandle) -> Result<String, ProcessingError>;
}

/// Fixes spelling in extracted text.
#[async_trait]
pub trait SpellCorrector: Send + Sync {
    async fn correct(&self, text: &str) -> Result<String, ProcessingError>;
}

// ---------------------------------------------------------------------------
// Simulated stages
// ---------------------------------------------------------------------------

/// Returns a fixed string after a fixed delay, whatever the image.
#[derive(Debug, Clone)]
pub struct SimulatedOcr {
    text: String,
    delay: Duration,
}

impl SimulatedOcr {
    pub fn new(text: impl Into<String>, delay: Duration) -> Self {
        Self {
            text: text.into(),
            delay,
        }
    }
}

#[async_trait]
impl OcrEngine for SimulatedOcr {
    async fn extract(&self, image: &ImageHandle) -> Result<String, ProcessingError> {
        log::debug!("ocr: simulating extraction of {:?}", image);
        tokio::time::sleep(self.delay).await;
        Ok(self.text.clone())
    }
}

/// Returns a fixed string after a fixed delay, whatever the input.
#[derive(Debug, Clone)]
pub struct SimulatedCorrector {
    text: String,
    delay: Duration,
}

impl SimulatedCorrector {
    pub fn new(text: impl Into<String>, delay: Duration) -> Self {
        Self {
            text: text.into(),
            delay,
        }
    }
}

#[async_trait]
impl SpellCorrector for SimulatedCorrector {
    async fn correct(&self, text: &str) -> Result<String, ProcessingError> {
        log::debug!("ocr: simulating correction (len={})", text.len());
        tokio::time::sleep(self.delay).await;
        Ok(self.text.clone())
    }
}

// ---------------------------------------------------------------------------
// ExtractorStages
// ---------------------------------------------------------------------------

/// The stage implementations one extractor runs.  No corrector means the
/// extracted text is final.
#[derive(Clone)]
pub struct ExtractorStages {
    pub ocr: Arc<dyn OcrEngine>,
    pub corrector: Option<Arc<dyn SpellCorrector>>,
}

impl ExtractorStages {
    /// Simulated stages for `variant`, with delays from `config`.
    pub fn simulated(variant: ExtractorVariant, config: &SimulationConfig) -> Self {
        match variant {
            ExtractorVariant::ExtractThenCorrect => Self {
                ocr: Arc::new(SimulatedOcr::new(MISSPELLED_SAMPLE, config.extract_delay())),
                corrector: Some(Arc::new(SimulatedCorrector::new(
                    CORRECTED_SAMPLE,
                    config.correct_delay(),
                ))),
            },
            ExtractorVariant::ExtractOnly => Self {
                ocr: Arc::new(SimulatedOcr::new(VIETNAMESE_SAMPLE, config.extract_delay())),
                corrector: None,
            },
        }
    }
}
