//! Conversation pane widget.
//!
//! Combines the transcript (scrollable history) with an input area at the
//! bottom.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols::line,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use chinwag_engine::TranscriptEntry;
use unicode_width::UnicodeWidthChar;

use crate::text::RunBuilder;
use crate::theme::Theme;
use crate::transcript::{TranscriptState, TranscriptWidget};
use crate::ui::widgets::TextInputState;

use super::placeholder::input_placeholder;

/// Fixed height for the input area (in lines).
const INPUT_HEIGHT: u16 = 3;

/// Height for the divider line.
const DIVIDER_HEIGHT: u16 = 1;

/// Conversation pane widget combining transcript and input.
///
/// ```text
/// ┌─ Conversation ──────────────────────┐
/// │                                      │
/// │  09:14 [you]                         │
/// │  hello                               │
/// │                                      │
/// │  09:14 [assistant]                   │
/// │  hi there                            │
/// │                                      │
/// ├──────────────────────────────────────┤
/// │ > Message chinwag...                 │
/// └──────────────────────────────────────┘
/// ```
pub struct ConversationPane<'a> {
    entries: &'a [TranscriptEntry],
    input: &'a TextInputState,
    theme: &'a Theme,
    busy: bool,
    spinner_frame: usize,
    focused: bool,
}

impl<'a> ConversationPane<'a> {
    /// Create a new conversation pane.
    pub fn new(
        entries: &'a [TranscriptEntry],
        input: &'a TextInputState,
        theme: &'a Theme,
    ) -> Self {
        Self {
            entries,
            input,
            theme,
            busy: false,
            spinner_frame: 0,
            focused: false,
        }
    }

    /// Set whether a request is outstanding (locks the input).
    #[must_use]
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    /// Set the spinner animation frame for the in-flight notice.
    #[must_use]
    pub fn spinner_frame(mut self, frame: usize) -> Self {
        self.spinner_frame = frame;
        self
    }

    /// Set whether this pane is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Render the input area.
    ///
    /// The draft is one logical line; it hard-wraps across the input rows
    /// and the view scrolls so the row holding the cursor stays visible.
    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let prompt = "> ";
        let prompt_style = Style::default().fg(self.theme.primary);
        let text_style = Style::default().fg(self.theme.text);

        if self.input.is_empty() {
            let mut spans = vec![Span::styled(prompt, prompt_style)];
            if self.focused && !self.busy {
                spans.push(Span::styled("_", text_style));
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                input_placeholder(self.busy),
                Style::default().fg(self.theme.muted),
            ));
            Paragraph::new(vec![Line::from(spans)]).render(area, buf);
            return;
        }

        // Flatten prompt, draft, and cursor marker into one styled char
        // sequence. The cursor is a byte offset on a char boundary, so
        // positions compare against char_indices.
        let content = self.input.content();
        let mut cells: Vec<(char, Style)> = prompt.chars().map(|ch| (ch, prompt_style)).collect();
        let mut cursor_at = None;
        for (byte_idx, ch) in content.char_indices() {
            if self.focused && byte_idx == self.input.cursor && cursor_at.is_none() {
                cursor_at = Some(cells.len());
                cells.push(('|', text_style));
            }
            cells.push((ch, text_style));
        }
        if self.focused && cursor_at.is_none() {
            cursor_at = Some(cells.len());
            cells.push(('_', text_style));
        }

        // Hard-wrap to the area width; a draft has no layout of its own, so
        // breaks can land anywhere.
        let max = area.width as usize;
        let mut rows: Vec<Vec<(char, Style)>> = vec![Vec::new()];
        let mut used = 0;
        let mut cursor_row = 0;
        for (idx, cell) in cells.into_iter().enumerate() {
            let width = cell.0.width().unwrap_or(0);
            if used + width > max && used > 0 {
                rows.push(Vec::new());
                used = 0;
            }
            if cursor_at == Some(idx) {
                cursor_row = rows.len() - 1;
            }
            let last = rows.len() - 1;
            rows[last].push(cell);
            used += width;
        }

        // Drop leading rows until the cursor row fits in the viewport.
        let viewport = area.height as usize;
        let skip = (cursor_row + 1).saturating_sub(viewport);
        let lines: Vec<Line<'static>> = rows
            .into_iter()
            .skip(skip)
            .take(viewport)
            .map(|row| {
                let mut builder = RunBuilder::default();
                for (ch, style) in row {
                    builder.push(ch, style);
                }
                builder.into_line()
            })
            .collect();

        Paragraph::new(lines).render(area, buf);
    }

    /// Render a horizontal divider line.
    fn render_divider(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 {
            return;
        }

        let divider_char = line::HORIZONTAL;
        let divider_str = divider_char.repeat(area.width as usize);

        let line = Line::from(Span::styled(
            divider_str,
            Style::default().fg(self.theme.border),
        ));

        Paragraph::new(vec![line]).render(area, buf);
    }
}

impl StatefulWidget for ConversationPane<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TranscriptState) {
        let border_style = if self.focused {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let block = Block::default()
            .title(" Conversation ")
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < INPUT_HEIGHT + DIVIDER_HEIGHT + 1 {
            // Not enough space - just show input
            self.render_input(inner, buf);
            return;
        }

        // Transcript takes all space except the divider and input.
        let transcript_height = inner.height.saturating_sub(INPUT_HEIGHT + DIVIDER_HEIGHT);
        let divider_y = inner.y + transcript_height;
        let input_y = divider_y + DIVIDER_HEIGHT;

        let transcript_area = Rect::new(inner.x, inner.y, inner.width, transcript_height);
        let divider_area = Rect::new(inner.x, divider_y, inner.width, DIVIDER_HEIGHT);
        let input_area = Rect::new(inner.x, input_y, inner.width, INPUT_HEIGHT);

        TranscriptWidget::new(self.entries, self.theme)
            .busy(self.busy)
            .spinner_frame(self.spinner_frame)
            .render(transcript_area, buf, state);

        self.render_divider(divider_area, buf);
        self.render_input(input_area, buf);
    }
}
