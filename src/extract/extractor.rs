//! Image-text extractor — drives OCR → (correction) → clipboard copy.
//!
//! [`ImageTextExtractor`] owns the [`ExtractionState`] for the tools screen.
//! A run is a tokio task that reports back over an mpsc channel; the UI
//! drains it every frame with [`poll`](ImageTextExtractor::poll).
//!
//! # Run flow
//!
//! ```text
//! extract()
//!   ├─ no image   → Err(MissingImage), error message shown
//!   ├─ busy       → Err(Busy)
//!   └─ spawn run                                        [Extracting]
//!        ├─ ocr.extract        → Extracted(text)        [Correcting | Done]
//!        ├─ corrector.correct  → Corrected(text)        [Done]
//!        ├─ any stage fails    → Failed                 [Error]
//!        └─ spawn_blocking(clipboard.write_text)
//!              ├─ Ok  → Copied … copied_flash … CopiedExpired
//!              └─ Err → warn only
//! ```
//!
//! Every run carries a generation number on its events.  Selecting a new
//! image aborts the in-flight run and bumps the generation; `poll` drops
//! events from older generations, since an aborted task may still deliver
//! one last event before it reaches its next `.await`.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::error::ValidationError;
use crate::extract::clipboard::{paste_image, ClipboardBackend, ClipboardError};
use crate::extract::engine::{ExtractorStages, ExtractorVariant};
use crate::extract::image::{ImageError, ImageHandle};
use crate::extract::state::{ExtractionState, ExtractionStatus};

/// User-visible message for a failed run.
pub const EXTRACTION_FAILED: &str = "Failed to extract text from image";

/// Why an extraction could not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("An extraction is already running")]
    Busy,
}

/// Progress reported by a running task, tagged with its run generation.
#[derive(Debug)]
struct Tagged {
    generation: u64,
    event: ExtractionEvent,
}

#[derive(Debug)]
enum ExtractionEvent {
    Extracted(String),
    Corrected(String),
    Failed,
    Copied,
    CopiedExpired,
}

// ---------------------------------------------------------------------------
// ImageTextExtractor
// ---------------------------------------------------------------------------

pub struct ImageTextExtractor {
    state: ExtractionState,
    error: Option<String>,
    copied: bool,
    variant: ExtractorVariant,
    stages: ExtractorStages,
    clipboard: Arc<dyn ClipboardBackend>,
    copied_flash: Duration,
    runtime: Handle,
    generation: Arc<AtomicU64>,
    event_tx: mpsc::Sender<Tagged>,
    event_rx: mpsc::Receiver<Tagged>,
    run_task: Option<JoinHandle<()>>,
    copy_task: Option<JoinHandle<()>>,
}

impl ImageTextExtractor {
    /// Create an extractor running `stages`.
    ///
    /// * `variant`      — used for labels only; the stages decide behaviour.
    /// * `clipboard`    — where results are copied and images pasted from.
    /// * `copied_flash` — how long the "Copied" indicator stays lit.
    /// * `runtime`      — tokio runtime that runs the stages.
    pub fn new(
        variant: ExtractorVariant,
        stages: ExtractorStages,
        clipboard: Arc<dyn ClipboardBackend>,
        copied_flash: Duration,
        runtime: Handle,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(8);
        Self {
            state: ExtractionState::default(),
            error: None,
            copied: false,
            variant,
            stages,
            clipboard,
            copied_flash,
            runtime,
            generation: Arc::default(),
            event_tx,
            event_rx,
            run_task: None,
            copy_task: None,
        }
    }

    /// Simulated stages for the configured variant.
    pub fn from_config(config: &AppConfig, clipboard: Arc<dyn ClipboardBackend>, runtime: Handle) -> Self {
        let variant = config.extractor.variant;
        Self::new(
            variant,
            ExtractorStages::simulated(variant, &config.simulation),
            clipboard,
            config.simulation.copied_flash(),
            runtime,
        )
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn state(&self) -> &ExtractionState {
        &self.state
    }

    /// Message to show under the controls, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `true` for a short while after a successful clipboard copy.
    pub fn is_copied(&self) -> bool {
        self.copied
    }

    pub fn is_busy(&self) -> bool {
        self.state.status.is_busy()
    }

    pub fn variant(&self) -> ExtractorVariant {
        self.variant
    }

    // ── Image selection ──────────────────────────────────────────────────

    /// Make `image` current, resetting all results and aborting any run.
    pub fn set_image(&mut self, image: ImageHandle) {
        log::debug!("extract: new image {:?}", image);
        self.abort_tasks();
        self.state.image = Some(image);
        self.state.reset_results();
        self.error = None;
        self.copied = false;
    }

    /// Load an image file from disk.  Failures are shown and returned.
    pub fn load_file(&mut self, path: &Path) -> Result<(), ImageError> {
        match ImageHandle::from_path(path) {
            Ok(image) => {
                self.set_image(image);
                Ok(())
            }
            Err(e) => {
                log::warn!("extract: cannot load {}: {e}", path.display());
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Take the first image on the clipboard.  Failures are shown and
    /// returned; the current image is kept.
    pub fn paste_from_clipboard(&mut self) -> Result<(), ClipboardError> {
        match paste_image(self.clipboard.as_ref()) {
            Ok(image) => {
                self.set_image(image);
                Ok(())
            }
            Err(e) => {
                log::warn!("extract: paste failed: {e}");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ── Pipeline ─────────────────────────────────────────────────────────

    /// Start a run on the current image.
    pub fn extract(&mut self) -> Result<(), ExtractError> {
        let Some(image) = self.state.image.clone() else {
            let err = ValidationError::MissingImage;
            self.error = Some(err.to_string());
            return Err(err.into());
        };
        if self.is_busy() {
            return Err(ExtractError::Busy);
        }

        self.abort_tasks();
        self.state.reset_results();
        self.state.status = ExtractionStatus::Extracting;
        self.error = None;
        self.copied = false;

        let stages = self.stages.clone();
        let clipboard = Arc::clone(&self.clipboard);
        let flash = self.copied_flash;
        let tx = self.reporter();

        self.run_task = Some(self.runtime.spawn(run_extraction(image, stages, clipboard, flash, tx)));
        log::debug!("extract: run started");
        Ok(())
    }

    /// Copy the final text again.  No-op until there is text.
    pub fn copy_result(&mut self) {
        let text = self.state.final_text().to_string();
        if text.is_empty() {
            return;
        }
        if let Some(task) = self.copy_task.take() {
            task.abort();
        }
        let clipboard = Arc::clone(&self.clipboard);
        let flash = self.copied_flash;
        let tx = self.reporter();
        self.copy_task = Some(
            self.runtime
                .spawn(async move { copy_with_flash(clipboard, text, flash, &tx).await }),
        );
    }

    /// Apply progress from running tasks.  Returns `true` if anything changed.
    pub fn poll(&mut self) -> bool {
        let finished = self.run_task.as_ref().is_some_and(|t| t.is_finished());
        let mut changed = false;

        while let Ok(Tagged { generation, event }) = self.event_rx.try_recv() {
            if generation != self.generation.load(Ordering::SeqCst) {
                log::debug!("extract: dropping stale {event:?} from run {generation}");
                continue;
            }
            changed = true;
            match event {
                ExtractionEvent::Extracted(text) => {
                    self.state.extracted_text = text;
                    self.state.status = if self.stages.corrector.is_some() {
                        ExtractionStatus::Correcting
                    } else {
                        ExtractionStatus::Done
                    };
                }
                ExtractionEvent::Corrected(text) => {
                    self.state.corrected_text = text;
                    self.state.status = ExtractionStatus::Done;
                }
                ExtractionEvent::Failed => {
                    self.state.status = ExtractionStatus::Error;
                    self.error = Some(EXTRACTION_FAILED.to_string());
                }
                ExtractionEvent::Copied => self.copied = true,
                ExtractionEvent::CopiedExpired => self.copied = false,
            }
        }

        if finished && self.is_busy() {
            log::error!("extract: run ended without a result");
            self.state.status = ExtractionStatus::Error;
            self.error = Some(EXTRACTION_FAILED.to_string());
            changed = true;
        }

        changed
    }

    /// Abort the in-flight run, returning to `Idle` with no results.
    pub fn cancel(&mut self) {
        self.abort_tasks();
        if self.is_busy() {
            self.state.reset_results();
        }
        self.copied = false;
    }

    fn reporter(&self) -> Reporter {
        Reporter {
            generation: self.generation.load(Ordering::SeqCst),
            current: Arc::clone(&self.generation),
            tx: self.event_tx.clone(),
        }
    }

    fn abort_tasks(&mut self) {
        for task in [self.run_task.take(), self.copy_task.take()].into_iter().flatten() {
            task.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        while self.event_rx.try_recv().is_ok() {}
    }
}

impl Drop for ImageTextExtractor {
    fn drop(&mut self) {
        for task in [self.run_task.take(), self.copy_task.take()].into_iter().flatten() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Sending half handed to a task; stamps every event with the task's run.
struct Reporter {
    generation: u64,
    current: Arc<AtomicU64>,
    tx: mpsc::Sender<Tagged>,
}

impl Reporter {
    /// `false` once the extractor has moved on to another run.
    fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    async fn send(&self, event: ExtractionEvent) {
        let tagged = Tagged {
            generation: self.generation,
            event,
        };
        let _ = self.tx.send(tagged).await;
    }
}

async fn run_extraction(
    image: ImageHandle,
    stages: ExtractorStages,
    clipboard: Arc<dyn ClipboardBackend>,
    flash: Duration,
    tx: Reporter,
) {
    let extracted = match stages.ocr.extract(&image).await {
        Ok(text) => text,
        Err(e) => {
            log::error!("extract: OCR stage failed: {e}");
            tx.send(ExtractionEvent::Failed).await;
            return;
        }
    };
    tx.send(ExtractionEvent::Extracted(extracted.clone())).await;

    let final_text = match stages.corrector {
        Some(corrector) => match corrector.correct(&extracted).await {
            Ok(text) => {
                tx.send(ExtractionEvent::Corrected(text.clone())).await;
                text
            }
            Err(e) => {
                log::error!("extract: correction stage failed: {e}");
                tx.send(ExtractionEvent::Failed).await;
                return;
            }
        },
        None => extracted,
    };

    copy_with_flash(clipboard, final_text, flash, &tx).await;
}

/// Write `text` to the clipboard on the blocking pool; on success light the
/// copied indicator for `flash`.  Failures are only logged.
async fn copy_with_flash(
    clipboard: Arc<dyn ClipboardBackend>,
    text: String,
    flash: Duration,
    tx: &Reporter,
) {
    if !tx.is_current() {
        log::debug!("extract: skipping copy for a superseded run");
        return;
    }
    let result = tokio::task::spawn_blocking(move || clipboard.write_text(&text)).await;

    match result {
        Ok(Ok(())) => {
            tx.send(ExtractionEvent::Copied).await;
            tokio::time::sleep(flash).await;
            tx.send(ExtractionEvent::CopiedExpired).await;
        }
        Ok(Err(e)) => log::warn!("extract: failed to copy text: {e}"),
        Err(e) => log::warn!("extract: clipboard task panicked: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::config::SimulationConfig;
    use crate::error::ProcessingError;
    use crate::extract::clipboard::ClipboardItem;
    use crate::extract::engine::{
        OcrEngine, SimulatedCorrector, CORRECTED_SAMPLE, MISSPELLED_SAMPLE, VIETNAMESE_SAMPLE,
    };

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// In-memory clipboard that records every write.
    #[derive(Default)]
    struct FakeClipboard {
        items: Vec<ClipboardItem>,
        deny_read: bool,
        fail_write: bool,
        writes: Mutex<Vec<String>>,
    }

    impl FakeClipboard {
        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl ClipboardBackend for FakeClipboard {
        fn read(&self) -> Result<Vec<ClipboardItem>, ClipboardError> {
            if self.deny_read {
                return Err(ClipboardError::Access("permission denied".into()));
            }
            Ok(self.items.clone())
        }

        fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            self.writes.lock().unwrap().push(text.to_string());
            if self.fail_write {
                return Err(ClipboardError::Write("denied".into()));
            }
            Ok(())
        }
    }

    struct FailingOcr;

    #[async_trait]
    impl OcrEngine for FailingOcr {
        async fn extract(&self, _image: &ImageHandle) -> Result<String, ProcessingError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Err(ProcessingError("unreadable".into()))
        }
    }

    /// Reports that it started, then holds its worker thread until released.
    struct GatedOcr {
        started: Mutex<std::sync::mpsc::Sender<()>>,
        release: Mutex<std::sync::mpsc::Receiver<()>>,
    }

    #[async_trait]
    impl OcrEngine for GatedOcr {
        async fn extract(&self, _image: &ImageHandle) -> Result<String, ProcessingError> {
            let _ = self.started.lock().unwrap().send(());
            let _ = self.release.lock().unwrap().recv();
            Ok("text from the previous image".into())
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn extractor(variant: ExtractorVariant, clipboard: Arc<FakeClipboard>) -> ImageTextExtractor {
        ImageTextExtractor::new(
            variant,
            ExtractorStages::simulated(variant, &SimulationConfig::default()),
            clipboard,
            Duration::from_millis(2000),
            Handle::current(),
        )
    }

    fn image() -> ImageHandle {
        ImageHandle::from_bytes("page.png", "image/png", vec![1, 2, 3])
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn extract_without_image_is_validation_error() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut ex = extractor(ExtractorVariant::ExtractThenCorrect, Arc::clone(&clipboard));

        assert_eq!(
            ex.extract(),
            Err(ExtractError::Validation(ValidationError::MissingImage))
        );
        assert_eq!(ex.error(), Some("Please upload an image first"));
        assert!(ex.state().extracted_text.is_empty());
        assert!(ex.state().corrected_text.is_empty());
        assert_eq!(ex.state().status, ExtractionStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn extract_then_correct_runs_both_stages_and_copies() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut ex = extractor(ExtractorVariant::ExtractThenCorrect, Arc::clone(&clipboard));
        ex.set_image(image());

        ex.extract().unwrap();
        assert_eq!(ex.state().status, ExtractionStatus::Extracting);

        advance(1400).await;
        ex.poll();
        assert!(ex.state().extracted_text.is_empty());

        advance(200).await; // t = 1600
        ex.poll();
        assert_eq!(ex.state().extracted_text, MISSPELLED_SAMPLE);
        assert_eq!(ex.state().status, ExtractionStatus::Correcting);
        assert!(ex.state().corrected_text.is_empty());

        advance(1000).await; // t = 2600
        ex.poll();
        assert_eq!(ex.state().corrected_text, CORRECTED_SAMPLE);
        assert_eq!(ex.state().status, ExtractionStatus::Done);
        assert_eq!(clipboard.writes(), vec![CORRECTED_SAMPLE.to_string()]);
        assert!(ex.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn extract_only_finishes_after_first_stage_and_copies() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut ex = extractor(ExtractorVariant::ExtractOnly, Arc::clone(&clipboard));
        ex.set_image(image());

        ex.extract().unwrap();
        advance(1600).await;
        ex.poll();

        assert_eq!(ex.state().extracted_text, VIETNAMESE_SAMPLE);
        assert!(ex.state().corrected_text.is_empty());
        assert_eq!(ex.state().status, ExtractionStatus::Done);
        assert_eq!(clipboard.writes(), vec![VIETNAMESE_SAMPLE.to_string()]);
        assert!(ex.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn copied_flag_clears_after_flash() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut ex = extractor(ExtractorVariant::ExtractOnly, Arc::clone(&clipboard));
        ex.set_image(image());
        ex.extract().unwrap();

        advance(1600).await;
        ex.poll();
        assert!(ex.is_copied());

        advance(1800).await; // t = 3400, flash ends at ~3500
        ex.poll();
        assert!(ex.is_copied());

        advance(300).await;
        ex.poll();
        assert!(!ex.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn copy_failure_is_silent() {
        let clipboard = Arc::new(FakeClipboard {
            fail_write: true,
            ..FakeClipboard::default()
        });
        let mut ex = extractor(ExtractorVariant::ExtractOnly, Arc::clone(&clipboard));
        ex.set_image(image());
        ex.extract().unwrap();

        advance(1600).await;
        ex.poll();

        assert_eq!(ex.state().status, ExtractionStatus::Done);
        assert_eq!(clipboard.writes().len(), 1);
        assert!(!ex.is_copied());
        assert!(ex.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn second_extract_while_busy_is_rejected() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut ex = extractor(ExtractorVariant::ExtractThenCorrect, clipboard);
        ex.set_image(image());

        ex.extract().unwrap();
        assert_eq!(ex.extract(), Err(ExtractError::Busy));

        advance(1600).await;
        ex.poll();
        assert_eq!(ex.extract(), Err(ExtractError::Busy));
    }

    #[tokio::test(start_paused = true)]
    async fn new_image_resets_state_and_drops_stale_run() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut ex = extractor(ExtractorVariant::ExtractThenCorrect, Arc::clone(&clipboard));
        ex.set_image(image());
        ex.extract().unwrap();

        advance(1600).await;
        ex.poll();
        assert!(!ex.state().extracted_text.is_empty());

        ex.set_image(ImageHandle::from_bytes("other.png", "image/png", vec![9]));
        assert_eq!(ex.state().status, ExtractionStatus::Idle);
        assert!(ex.state().extracted_text.is_empty());

        advance(3000).await;
        ex.poll();
        assert!(ex.state().corrected_text.is_empty());
        assert_eq!(ex.state().status, ExtractionStatus::Idle);
        assert!(clipboard.writes().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn late_event_from_replaced_run_is_ignored() {
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel();
        let stages = ExtractorStages {
            ocr: Arc::new(GatedOcr {
                started: Mutex::new(started_tx),
                release: Mutex::new(release_rx),
            }),
            corrector: Some(Arc::new(SimulatedCorrector::new(
                CORRECTED_SAMPLE,
                Duration::from_millis(50),
            ))),
        };
        let clipboard = Arc::new(FakeClipboard::default());
        let mut ex = ImageTextExtractor::new(
            ExtractorVariant::ExtractThenCorrect,
            stages,
            Arc::clone(&clipboard) as Arc<dyn ClipboardBackend>,
            Duration::from_millis(50),
            Handle::current(),
        );
        ex.set_image(image());
        ex.extract().unwrap();

        // The OCR stage is already running on a worker when the image changes,
        // so the abort cannot stop it from reporting.
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        ex.set_image(ImageHandle::from_bytes("new.png", "image/png", vec![7]));
        release_tx.send(()).unwrap();

        for _ in 0..30 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            ex.poll();
        }

        assert_eq!(ex.state().image.as_ref().map(|i| i.name()), Some("new.png"));
        assert_eq!(ex.state().status, ExtractionStatus::Idle);
        assert!(ex.state().extracted_text.is_empty());
        assert!(ex.state().corrected_text.is_empty());
        assert!(clipboard.writes().is_empty());

        drop(release_tx);
        assert!(ex.extract().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn failing_stage_moves_to_error() {
        let clipboard = Arc::new(FakeClipboard::default());
        let stages = ExtractorStages {
            ocr: Arc::new(FailingOcr),
            corrector: None,
        };
        let mut ex = ImageTextExtractor::new(
            ExtractorVariant::ExtractOnly,
            stages,
            Arc::clone(&clipboard) as Arc<dyn ClipboardBackend>,
            Duration::from_millis(2000),
            Handle::current(),
        );
        ex.set_image(image());
        ex.extract().unwrap();

        advance(200).await;
        ex.poll();

        assert_eq!(ex.state().status, ExtractionStatus::Error);
        assert_eq!(ex.error(), Some(EXTRACTION_FAILED));
        assert!(ex.state().extracted_text.is_empty());
        assert!(clipboard.writes().is_empty());

        // Error is not busy; the user can retry.
        assert!(ex.extract().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn paste_picks_clipboard_image() {
        let clipboard = Arc::new(FakeClipboard {
            items: vec![ClipboardItem {
                kind: "image/png".into(),
                data: vec![4, 5],
                dimensions: Some((1, 1)),
            }],
            ..FakeClipboard::default()
        });
        let mut ex = extractor(ExtractorVariant::ExtractThenCorrect, clipboard);

        ex.paste_from_clipboard().unwrap();

        let image = ex.state().image.as_ref().unwrap();
        assert_eq!(image.mime(), "image/png");
        assert!(ex.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn paste_without_image_shows_error_and_keeps_current_image() {
        let clipboard = Arc::new(FakeClipboard {
            items: vec![ClipboardItem {
                kind: "text/plain".into(),
                data: b"hello".to_vec(),
                dimensions: None,
            }],
            ..FakeClipboard::default()
        });
        let mut ex = extractor(ExtractorVariant::ExtractThenCorrect, clipboard);
        ex.set_image(image());

        assert_eq!(ex.paste_from_clipboard(), Err(ClipboardError::NoImage));
        assert_eq!(ex.error(), Some("No image found in clipboard"));
        assert_eq!(ex.state().image.as_ref().map(|i| i.name()), Some("page.png"));
    }

    #[tokio::test(start_paused = true)]
    async fn paste_denied_is_permission_error() {
        let clipboard = Arc::new(FakeClipboard {
            deny_read: true,
            ..FakeClipboard::default()
        });
        let mut ex = extractor(ExtractorVariant::ExtractThenCorrect, clipboard);

        let err = ex.paste_from_clipboard().unwrap_err();
        assert!(matches!(err, ClipboardError::Access(_)));
        assert!(ex.error().is_some_and(|m| m.contains("denied")));
        assert!(ex.state().image.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_copy_rewrites_final_text() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut ex = extractor(ExtractorVariant::ExtractThenCorrect, Arc::clone(&clipboard));

        ex.copy_result();
        advance(10).await;
        assert!(clipboard.writes().is_empty());

        ex.set_image(image());
        ex.extract().unwrap();
        advance(2600).await;
        ex.poll();

        advance(2500).await;
        ex.poll();
        assert!(!ex.is_copied());

        ex.copy_result();
        advance(10).await;
        ex.poll();
        assert!(ex.is_copied());
        assert_eq!(
            clipboard.writes(),
            vec![CORRECTED_SAMPLE.to_string(), CORRECTED_SAMPLE.to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_returns_to_idle() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut ex = extractor(ExtractorVariant::ExtractThenCorrect, Arc::clone(&clipboard));
        ex.set_image(image());
        ex.extract().unwrap();

        ex.cancel();
        assert_eq!(ex.state().status, ExtractionStatus::Idle);

        advance(5000).await;
        ex.poll();
        assert_eq!(ex.state().status, ExtractionStatus::Idle);
        assert!(clipboard.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn load_file_rejects_non_image() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut ex = extractor(ExtractorVariant::ExtractThenCorrect, clipboard);

        assert!(ex.load_file(Path::new("notes.txt")).is_err());
        assert!(ex.error().is_some_and(|m| m.starts_with("Not an image file")));
        assert!(ex.state().image.is_none());
    }
}
