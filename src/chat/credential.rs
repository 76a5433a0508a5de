//! API-key gate in front of the chat screen.
//!
//! No authentication happens: the key is checked for shape only, held in
//! memory for the lifetime of the chat session and dropped on sign-out.

use crate::error::ValidationError;

/// Prefix every Gemini API key is expected to start with.
pub const CREDENTIAL_PREFIX: &str = "AI";

/// A validated API key.
///
/// `Debug` is redacted so the key can't leak into log output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validate `input` and wrap it.
    ///
    /// ```
    /// use gemini_studio::chat::Credential;
    /// use gemini_studio::error::ValidationError;
    ///
    /// assert!(Credential::parse("AItest123").is_ok());
    /// assert_eq!(Credential::parse("  "), Err(ValidationError::EmptyCredential));
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError::EmptyCredential);
        }
        if !input.starts_with(CREDENTIAL_PREFIX) {
            return Err(ValidationError::MalformedCredential {
                prefix: CREDENTIAL_PREFIX,
            });
        }
        Ok(Self(input.to_string()))
    }

    /// The key with everything but its first and last four characters hidden,
    /// for display.  Keys of eight characters or fewer show only the prefix.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return format!("{CREDENTIAL_PREFIX}…");
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
