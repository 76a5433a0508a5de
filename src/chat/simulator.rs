//! Chat reply simulator — one in-flight turn at a time.
//!
//! # Turn flow
//!
//! ```text
//! send(input)
//!   ├─ empty / whitespace         → Err(EmptyInput), log untouched
//!   ├─ reply pending              → Err(Busy)
//!   └─ push user Message, pending = true
//!        └─ spawn: backend.reply(input, settings)     [tokio task]
//!              ├─ Ok(text) → channel ← text
//!              └─ Err(_)   → channel ← APOLOGY
//!
//! poll()  (every frame)
//!   └─ channel → push assistant Message, pending = false
//! ```
//!
//! The pending reply is a tokio task; [`ChatSimulator::cancel`] and `Drop`
//! abort it so no reply lands after the chat session is gone.  Replies carry
//! the turn number they belong to, and `poll` ignores any from a cancelled
//! turn that got out before the abort took effect.

use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::chat::backend::ReplyBackend;
use crate::chat::message::{Message, MessageLog, Role};
use crate::chat::ModelSettings;
use crate::error::ValidationError;

/// Assistant message appended when the backend fails.
pub const APOLOGY: &str = "Sorry, there was an error processing your request. Please try again.";

/// Why a send was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A reply is still pending; input is disabled until it lands.
    #[error("Waiting for the previous reply")]
    Busy,
}

/// State container for one chat session.
pub struct ChatSimulator {
    log: MessageLog,
    pending: bool,
    settings: ModelSettings,
    backend: Arc<dyn ReplyBackend>,
    runtime: Handle,
    turn: u64,
    reply_tx: mpsc::Sender<(u64, String)>,
    reply_rx: mpsc::Receiver<(u64, String)>,
    task: Option<JoinHandle<()>>,
}

impl ChatSimulator {
    /// Create an empty session.  Replies run on `runtime`.
    pub fn new(backend: Arc<dyn ReplyBackend>, settings: ModelSettings, runtime: Handle) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel(4);
        Self {
            log: MessageLog::new(),
            pending: false,
            settings,
            backend,
            runtime,
            turn: 0,
            reply_tx,
            reply_rx,
            task: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    /// `true` while a reply is outstanding.  The input control is disabled.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Replace the committed model settings used by subsequent turns.
    pub fn set_settings(&mut self, settings: ModelSettings) {
        log::debug!("chat: model settings updated: {settings:?}");
        self.settings = settings;
    }

    /// Start a turn with `input`.
    pub fn send(&mut self, input: &str) -> Result<(), ChatError> {
        if input.trim().is_empty() {
            return Err(ValidationError::EmptyInput.into());
        }
        if self.pending {
            return Err(ChatError::Busy);
        }

        self.log.push(Role::User, input);
        self.pending = true;

        let backend = Arc::clone(&self.backend);
        let settings = self.settings;
        let prompt = input.to_string();
        let tx = self.reply_tx.clone();
        let turn = self.turn;

        self.task = Some(self.runtime.spawn(async move {
            let content = match backend.reply(&prompt, &settings).await {
                Ok(text) => text,
                Err(e) => {
                    log::error!("chat: reply failed: {e}");
                    APOLOGY.to_string()
                }
            };
            let _ = tx.send((turn, content)).await;
        }));

        log::debug!("chat: turn started");
        Ok(())
    }

    /// Apply any reply that has landed.  Returns `true` if the log changed.
    ///
    /// A reply task that ended without delivering (e.g. it panicked) still
    /// ends the turn, with [`APOLOGY`] as the reply.
    pub fn poll(&mut self) -> bool {
        let finished = self.task.as_ref().is_some_and(|t| t.is_finished());
        let mut changed = false;

        while let Ok((turn, content)) = self.reply_rx.try_recv() {
            if turn != self.turn {
                log::debug!("chat: dropping reply from cancelled turn {turn}");
                continue;
            }
            self.log.push(Role::Assistant, content);
            self.pending = false;
            self.task = None;
            changed = true;
        }

        if self.pending && finished {
            log::error!("chat: reply task ended without a reply");
            self.log.push(Role::Assistant, APOLOGY);
            self.pending = false;
            self.task = None;
            changed = true;
        }

        changed
    }

    /// Abort the pending turn, if any.  The user message stays in the log.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            log::debug!("chat: pending turn cancelled");
        }
        self.turn += 1;
        while self.reply_rx.try_recv().is_ok() {}
        self.pending = false;
    }

    /// Cancel any pending turn and empty the log.
    pub fn clear(&mut self) {
        self.cancel();
        self.log.clear();
    }
}

impl Drop for ChatSimulator {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
