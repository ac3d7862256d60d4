//! Text rendering utilities.
//!
//! This module provides shared text rendering functionality:
//! - [`render_markdown`] - Render markdown to styled ratatui Lines
//! - [`wrap_text`], [`wrap_lines`] - Text wrapping utilities

mod markdown;
mod wrap;

pub use markdown::render_markdown;
pub(crate) use wrap::RunBuilder;
pub use wrap::{wrap_lines, wrap_text};
