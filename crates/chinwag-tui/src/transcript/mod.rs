//! Scrollable transcript view.
//!
//! Renders the conversation history as origin-tagged blocks. The widget
//! derives everything it shows from the entry list plus the busy flag;
//! the in-flight notice is synthesized at render time and never stored.

mod state;
mod widget;

pub use state::TranscriptState;
pub use widget::TranscriptWidget;
