//! UI module for the chinwag TUI.

pub mod layout;
pub mod widgets;

pub use layout::*;
pub use widgets::*;
