//! Reply backends for the chat screen.
//!
//! [`ReplyBackend`] is the seam where a real generative-language API client
//! would plug in.  The only implementation shipped is [`SimulatedReply`],
//! which waits a fixed delay and answers with a canned template.

use std::time::Duration;

use async_trait::async_trait;

use crate::chat::ModelSettings;
use crate::config::SimulationConfig;
use crate::error::ProcessingError;

/// Async trait for producing an assistant reply to one user message.
///
/// Implementors must be `Send + Sync` so they can be shared with spawned
/// tasks behind an `Arc<dyn ReplyBackend>`.
#[async_trait]
pub trait ReplyBackend: Send + Sync {
    async fn reply(&self, prompt: &str, settings: &ModelSettings) -> Result<String, ProcessingError>;
}

/// Canned reply embedding the user's message.
pub fn simulated_reply_text(prompt: &str) -> String {
    format!(
        "This is a simulated response to: \"{prompt}\". In a real implementation, \
         this would be a response from the Gemini API using your API key and the \
         specified model settings."
    )
}

/// Answers every prompt with [`simulated_reply_text`] after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedReply {
    delay: Duration,
}

impl SimulatedReply {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.reply_delay())
    }
}

#[async_trait]
impl ReplyBackend for SimulatedReply {
    async fn reply(&self, prompt: &str, settings: &ModelSettings) -> Result<String, ProcessingError> {
        log::debug!(
            "chat: simulating reply (len={}, temperature={}, max_output_tokens={})",
            prompt.len(),
            settings.temperature,
            settings.max_output_tokens
        );
        tokio::time::sleep(self.delay).await;
        Ok(simulated_reply_text(prompt))
    }
}
