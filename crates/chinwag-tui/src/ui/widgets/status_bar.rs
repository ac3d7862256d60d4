//! Status bar widget.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A key hint for the status bar.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Status bar widget displayed at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    theme: &'a Theme,
    hints: Vec<KeyHint>,
    right_text: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar.
    pub fn new(mode: &'a str, theme: &'a Theme) -> Self {
        Self {
            mode,
            theme,
            hints: Vec::new(),
            right_text: None,
        }
    }

    /// Add key hints.
    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Set right-aligned text.
    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right_text = Some(text);
        self
    }
}

impl Widget for StatusBar<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let theme = self.theme;

        // Fill background with status bar color
        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_bg(theme.surface);
        }

        // Build left side: mode + hints
        let mut spans = Vec::new();

        // Mode indicator (bright accent background)
        spans.push(Span::styled(
            format!(" {} ", self.mode),
            Style::default().bg(theme.primary).fg(theme.base),
        ));
        spans.push(Span::styled(" ", Style::default().bg(theme.surface)));

        // Key hints
        for hint in &self.hints {
            spans.push(Span::styled(
                format!(" {} ", hint.key),
                Style::default()
                    .fg(theme.text)
                    .bg(theme.overlay)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {} ", hint.label),
                Style::default().fg(theme.subtext).bg(theme.surface),
            ));
        }

        let left_line = Line::from(spans);
        let left_width = left_line.width() as u16;
        buf.set_line(area.x, area.y, &left_line, area.width);

        // Right-aligned text, truncated when the hints leave little room
        if let Some(text) = self.right_text {
            let avail = area.width.saturating_sub(left_width).saturating_sub(2) as usize;
            if avail >= 4 {
                let display = ellipsize(text, avail);
                let text_len = display.width() as u16;
                let x = area.x + area.width - text_len - 1;
                buf.set_string(
                    x,
                    area.y,
                    &display,
                    Style::default().fg(theme.subtext).bg(theme.surface),
                );
            }
        }
    }
}

/// Shorten `text` to at most `max` terminal cells, ending in `…` when
/// anything was cut. Wide characters never straddle the cut.
fn ellipsize(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }

    let budget = max.saturating_sub(1);
    let mut kept = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let cells = ch.width().unwrap_or(0);
        if used + cells > budget {
            break;
        }
        kept.push(ch);
        used += cells;
    }
    kept.push('\u{2026}');
    kept
}
