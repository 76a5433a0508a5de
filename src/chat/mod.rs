//! Chat screen state: credential gate, model settings, message log and the
//! simulated reply pipeline.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gemini_studio::chat::{ChatSimulator, Credential, ModelSettings, SimulatedReply};
//! use gemini_studio::config::SimulationConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let _key = Credential::parse("AItest123").unwrap();
//!     let backend = Arc::new(SimulatedReply::from_config(&SimulationConfig::default()));
//!     let mut chat = ChatSimulator::new(
//!         backend,
//!         ModelSettings::default(),
//!         tokio::runtime::Handle::current(),
//!     );
//!
//!     chat.send("Hello!").unwrap();
//!     tokio::time::sleep(std::time::Duration::from_millis(1600)).await;
//!     chat.poll();
//!     println!("{}", chat.messages()[1].content);
//! }
//! ```

pub mod backend;
pub mod credential;
pub mod message;
pub mod settings;
pub mod simulator;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use backend::{simulated_reply_text, ReplyBackend, SimulatedReply};
pub use credential::{Credential, CREDENTIAL_PREFIX};
pub use message::{Message, MessageLog, Role};
pub use settings::{ModelSettings, SettingsError, SettingsForm, DEFAULT_MAX_OUTPUT_TOKENS};
pub use simulator::{ChatError, ChatSimulator, APOLOGY};
