//! Extraction state machine.
//!
//! [`ExtractionStatus`] drives the tools screen.  The UI reads it through
//! [`ImageTextExtractor::state`](crate::extract::ImageTextExtractor::state)
//! to decide which widgets to show and whether the trigger is enabled.

use crate::extract::ImageHandle;

// ---------------------------------------------------------------------------
// ExtractionStatus
// ---------------------------------------------------------------------------

/// Phases of one extraction run.
///
/// ```text
/// Idle ──extract()──▶ Extracting
///                     ──OCR done──▶ Correcting  (extract-then-correct)
///                                   ──correction done──▶ Done
///                     ──OCR done──▶ Done        (extract-only)
/// any state ──failure──▶ Error
/// any state ──new image──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionStatus {
    /// No run has started for the current image.
    #[default]
    Idle,

    /// The OCR stage is running.
    Extracting,

    /// OCR is complete; the spelling corrector is running.
    Correcting,

    /// The final text is ready and a clipboard copy has been attempted.
    Done,

    /// A simulated stage failed.  The user can trigger again.
    Error,
}

impl ExtractionStatus {
    /// Returns `true` while a run is in flight.
    ///
    /// The UI uses this to disable the extract button while busy.
    ///
    /// ```
    /// use gemini_studio::extract::ExtractionStatus;
    ///
    /// assert!(!ExtractionStatus::Idle.is_busy());
    /// assert!(ExtractionStatus::Extracting.is_busy());
    /// assert!(ExtractionStatus::Correcting.is_busy());
    /// assert!(!ExtractionStatus::Done.is_busy());
    /// assert!(!ExtractionStatus::Error.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, ExtractionStatus::Extracting | ExtractionStatus::Correcting)
    }

    /// A short human-readable label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionStatus::Idle => "Idle",
            ExtractionStatus::Extracting => "Extracting",
            ExtractionStatus::Correcting => "Correcting",
            ExtractionStatus::Done => "Done",
            ExtractionStatus::Error => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// ExtractionState
// ---------------------------------------------------------------------------

/// Everything the tools screen renders for the current image.
#[derive(Debug, Clone, Default)]
pub struct ExtractionState {
    /// The selected image, if any.
    pub image: Option<ImageHandle>,

    /// Raw OCR output.  Empty until the OCR stage completes.
    pub extracted_text: String,

    /// Spell-corrected text.  Empty until correction completes, and always
    /// empty in extract-only mode.
    pub corrected_text: String,

    pub status: ExtractionStatus,
}

impl ExtractionState {
    /// Forget the results of any previous run, keeping the image.
    pub fn reset_results(&mut self) {
        self.extracted_text.clear();
        self.corrected_text.clear();
        self.status = ExtractionStatus::Idle;
    }

    /// The text a copy action puts on the clipboard: the corrected text when
    /// there is one, otherwise the extracted text.
    pub fn final_text(&self) -> &str {
        if self.corrected_text.is_empty() {
            &self.extracted_text
        } else {
            &self.corrected_text
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
