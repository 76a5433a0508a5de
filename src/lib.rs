//! Gemini Studio — a desktop demo with a simulated Gemini chat and a
//! simulated image-to-text extraction tool.
//!
//! All backend behaviour is simulated with fixed delays and canned text; the
//! async traits in [`chat`] and [`extract`] mark where real clients would go.

pub mod app;
pub mod chat;
pub mod config;
pub mod error;
pub mod extract;
