//! chinwag-engine: Headless engine for the chinwag terminal chat client
//!
//! This crate provides everything below the terminal UI, including:
//! - The append-only conversation transcript
//! - The busy-gated submit/resolve session flow
//! - An HTTP client for Gemini-style `generateContent` endpoints
//! - Explicit service configuration

pub mod completion;
pub mod config;
pub mod session;
pub mod transcript;

// Re-export commonly used types
pub use completion::{CompletionClient, CompletionError};
pub use config::{Config, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use session::{ChatSession, FALLBACK_REPLY};
pub use transcript::{Origin, Transcript, TranscriptEntry};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
