//! Conversation pane module.
//!
//! The conversation pane fills the main area of the TUI, containing:
//! - Transcript (scrollable message history)
//! - Input area (always present, locked while a request is in flight)

mod placeholder;
mod widget;

pub use placeholder::input_placeholder;
pub use widget::ConversationPane;
