//! Theme components for the TUI.
//!
//! This module provides [`Theme`], the color palette (Catppuccin
//! Mocha/Latte plus a high-contrast variant).

mod colors;

pub use colors::Theme;
