//! Conversation transcript types.
//!
//! The transcript is an append-only log: entries are immutable once created
//! and insertion order is display order. Nothing is persisted; the log lives
//! and dies with the session.

use chrono::{DateTime, Utc};

/// Origin of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Typed by the user.
    User,
    /// Generated by the model (or the fallback reply on failure).
    Assistant,
}

impl Origin {
    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            Origin::User => "you",
            Origin::Assistant => "assistant",
        }
    }
}

/// A single entry in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Who produced the text.
    pub origin: Origin,
    /// Entry content.
    pub text: String,
    /// Capture time, for display only.
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    /// Create a user entry.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant entry.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only sequence of transcript entries.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Entries are never modified or removed afterwards.
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }
}
