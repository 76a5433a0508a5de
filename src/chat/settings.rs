//! Model sampling settings and the draft/commit form that edits them.
//!
//! [`ModelSettings`] declares its ranges as constants and is validated at the
//! edit boundary: every [`SettingsForm`] setter clamps into range, and
//! [`SettingsForm::save`] re-checks with [`ModelSettings::validate`] before
//! handing the draft back as the new committed value.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token count used when the max-output-tokens field can't be parsed.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

// ---------------------------------------------------------------------------
// ModelSettings
// ---------------------------------------------------------------------------

/// Sampling parameters sent along with every chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl ModelSettings {
    pub const TEMPERATURE: RangeInclusive<f32> = 0.0..=1.0;
    pub const TOP_K: RangeInclusive<u32> = 1..=100;
    pub const TOP_P: RangeInclusive<f32> = 0.0..=1.0;
    pub const MAX_OUTPUT_TOKENS: RangeInclusive<u32> = 1..=8192;

    /// Check every field against its declared range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !Self::TEMPERATURE.contains(&self.temperature) {
            return Err(SettingsError::OutOfRange {
                field: "temperature",
                value: self.temperature.to_string(),
            });
        }
        if !Self::TOP_K.contains(&self.top_k) {
            return Err(SettingsError::OutOfRange {
                field: "top_k",
                value: self.top_k.to_string(),
            });
        }
        if !Self::TOP_P.contains(&self.top_p) {
            return Err(SettingsError::OutOfRange {
                field: "top_p",
                value: self.top_p.to_string(),
            });
        }
        if !Self::MAX_OUTPUT_TOKENS.contains(&self.max_output_tokens) {
            return Err(SettingsError::OutOfRange {
                field: "max_output_tokens",
                value: self.max_output_tokens.to_string(),
            });
        }
        Ok(())
    }

    /// Copy with every field clamped into its range.  NaN floats become the
    /// range minimum.
    pub fn clamped(self) -> Self {
        Self {
            temperature: clamp_f32(self.temperature, &Self::TEMPERATURE),
            top_k: self.top_k.clamp(*Self::TOP_K.start(), *Self::TOP_K.end()),
            top_p: clamp_f32(self.top_p, &Self::TOP_P),
            max_output_tokens: self
                .max_output_tokens
                .clamp(*Self::MAX_OUTPUT_TOKENS.start(), *Self::MAX_OUTPUT_TOKENS.end()),
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

fn clamp_f32(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

/// A settings value fell outside its declared range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// SettingsForm
// ---------------------------------------------------------------------------

/// Draft editor for [`ModelSettings`].
///
/// Opening the form copies the committed settings; nothing the form does
/// touches the committed value until [`save`](Self::save) returns the draft.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    draft: ModelSettings,
    /// Raw text of the max-output-tokens field while it is being typed.
    max_tokens_text: String,
}

impl SettingsForm {
    pub fn open(committed: &ModelSettings) -> Self {
        Self {
            draft: *committed,
            max_tokens_text: committed.max_output_tokens.to_string(),
        }
    }

    pub fn draft(&self) -> &ModelSettings {
        &self.draft
    }

    pub fn set_temperature(&mut self, value: f32) {
        self.draft.temperature = clamp_f32(value, &ModelSettings::TEMPERATURE);
    }

    pub fn set_top_k(&mut self, value: u32) {
        self.draft.top_k = value.clamp(*ModelSettings::TOP_K.start(), *ModelSettings::TOP_K.end());
    }

    pub fn set_top_p(&mut self, value: f32) {
        self.draft.top_p = clamp_f32(value, &ModelSettings::TOP_P);
    }

    pub fn set_max_output_tokens(&mut self, value: u32) {
        self.draft.max_output_tokens = value.clamp(
            *ModelSettings::MAX_OUTPUT_TOKENS.start(),
            *ModelSettings::MAX_OUTPUT_TOKENS.end(),
        );
        self.max_tokens_text = self.draft.max_output_tokens.to_string();
    }

    /// Mutable access to the raw token-count text for a text-edit widget.
    /// Call [`commit_max_tokens_text`](Self::commit_max_tokens_text) after
    /// every edit.
    pub fn max_tokens_text_mut(&mut self) -> &mut String {
        &mut self.max_tokens_text
    }

    /// Parse the token-count text into the draft.
    ///
    /// The leading integer is used and anything after it ignored, so `"12x"`
    /// reads as 12 and `"300.5"` as 300.  Text with no leading digits, or a
    /// zero, falls back to [`DEFAULT_MAX_OUTPUT_TOKENS`].  The result is
    /// clamped; the text itself is left as typed so the user can keep editing.
    pub fn commit_max_tokens_text(&mut self) {
        let parsed = match leading_int(&self.max_tokens_text) {
            Some(0) | None => i64::from(DEFAULT_MAX_OUTPUT_TOKENS),
            Some(n) => n,
        };
        let (min, max) = (
            *ModelSettings::MAX_OUTPUT_TOKENS.start(),
            *ModelSettings::MAX_OUTPUT_TOKENS.end(),
        );
        self.draft.max_output_tokens = parsed.clamp(i64::from(min), i64::from(max)) as u32;
    }

    /// Finish editing and return the draft as the new committed settings.
    pub fn save(mut self) -> Result<ModelSettings, SettingsError> {
        self.commit_max_tokens_text();
        self.draft.validate()?;
        Ok(self.draft)
    }

    /// Discard the draft.
    pub fn cancel(self) {}
}

/// Optional sign followed by decimal digits at the start of `text` (leading
/// whitespace skipped).  Saturates instead of overflowing.
fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits: Vec<i64> = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits
        .into_iter()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(d));
    Some(if negative { -magnitude } else { magnitude })
}
