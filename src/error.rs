//! Input-validation errors shared by both screens.
//!
//! Every variant is raised before any state mutation and is rendered inline
//! next to the control that triggered it, so the `Display` strings are the
//! user-facing messages.

use thiserror::Error;

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The credential field was empty or whitespace.
    #[error("Please enter your Gemini API key")]
    EmptyCredential,

    /// The credential does not carry the expected prefix.
    #[error("Invalid API key format. Gemini API keys typically start with '{prefix}'")]
    MalformedCredential { prefix: &'static str },

    /// The chat input was empty or whitespace.
    #[error("Message is empty")]
    EmptyInput,

    /// Extraction was triggered with no image selected.
    #[error("Please upload an image first")]
    MissingImage,
}

/// A simulated backend stage failed.
///
/// The message is for the log only; the UI swaps in its own fixed apology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("simulated processing failed: {0}")]
pub struct ProcessingError(pub String);
