//! Transcript rendering.
//!
//! Each entry becomes a time-stamped, origin-tagged header followed by its
//! body. User text is wrapped plainly; assistant replies render as markdown.
//! While a request is outstanding, a single in-flight notice is appended to
//! the rendered lines without ever touching the transcript itself.

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

use chinwag_engine::{Origin, TranscriptEntry};

use crate::text::{render_markdown, wrap_text};
use crate::theme::Theme;

use super::TranscriptState;

/// Notice shown under the spinner while a reply is pending.
const LOADING_NOTICE: &str = "Loading your answer... It might take up to 10 seconds";

/// Greeting shown before the first message.
const WELCOME: &str = "How can I help you today?";

/// Starter prompts listed under the greeting.
const SUGGESTIONS: [&str; 2] = [
    "Try asking about the weather today.",
    "What's the latest news?",
];

/// Spinner frames for the in-flight notice.
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Stateful widget rendering the conversation transcript.
///
/// Scroll position lives in [`TranscriptState`]; the widget reports the
/// wrapped line count back to it on every draw.
pub struct TranscriptWidget<'a> {
    entries: &'a [TranscriptEntry],
    theme: &'a Theme,
    busy: bool,
    spinner_frame: usize,
}

impl<'a> TranscriptWidget<'a> {
    /// Create a widget over the given entries.
    pub fn new(entries: &'a [TranscriptEntry], theme: &'a Theme) -> Self {
        Self {
            entries,
            theme,
            busy: false,
            spinner_frame: 0,
        }
    }

    /// Set whether a request is outstanding.
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

    /// Header line for an entry: local time plus an origin badge.
    fn header_line(&self, entry: &TranscriptEntry) -> Line<'static> {
        let color = match entry.origin {
            Origin::User => self.theme.user,
            Origin::Assistant => self.theme.assistant,
        };
        let time = entry
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();

        Line::from(vec![
            Span::styled(time, Style::default().fg(self.theme.muted)),
            Span::raw(" "),
            Span::styled(
                format!("[{}]", entry.origin.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ])
    }

    /// Greeting block shown while the transcript is empty.
    fn welcome_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::default(),
            Line::styled(
                WELCOME,
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::default(),
        ];
        for suggestion in SUGGESTIONS {
            lines.push(Line::styled(
                suggestion,
                Style::default().fg(self.theme.muted),
            ));
        }
        lines
    }

    /// Build the full line list, wrapped to `width`.
    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        if self.entries.is_empty() && !self.busy {
            return self.welcome_lines();
        }

        let mut lines = Vec::new();
        for entry in self.entries {
            lines.push(self.header_line(entry));
            match entry.origin {
                Origin::User => {
                    for chunk in wrap_text(&entry.text, width) {
                        lines.push(Line::styled(chunk, Style::default().fg(self.theme.text)));
                    }
                }
                Origin::Assistant => {
                    lines.extend(render_markdown(&entry.text, width, self.theme));
                }
            }
            lines.push(Line::default());
        }

        if self.busy {
            let frame = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            lines.push(Line::from(vec![
                Span::styled(frame, Style::default().fg(self.theme.assistant)),
                Span::raw(" "),
                Span::styled(
                    "[assistant]",
                    Style::default()
                        .fg(self.theme.assistant)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            for chunk in wrap_text(LOADING_NOTICE, width) {
                lines.push(Line::styled(chunk, Style::default().fg(self.theme.muted)));
            }
        }

        lines
    }
}

impl StatefulWidget for TranscriptWidget<'_> {
    type State = TranscriptState;

    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TranscriptState) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Reserve the rightmost column for the scrollbar so wrapping stays
        // stable whether or not it is shown.
        let wrap_width = area.width.saturating_sub(1) as usize;
        let lines = self.build_lines(wrap_width);
        let total = lines.len();
        state.set_geometry(total, area.height as usize);

        Paragraph::new(Text::from(lines))
            .style(Style::default().bg(self.theme.base).fg(self.theme.text))
            .scroll((state.offset() as u16, 0))
            .render(area, buf);

        if total > area.height as usize {
            let mut scrollbar_state =
                ScrollbarState::new(state.max_offset()).position(state.offset());
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .render(area, buf, &mut scrollbar_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn draw(
        terminal: &mut Terminal<TestBackend>,
        entries: &[TranscriptEntry],
        busy: bool,
        state: &mut TranscriptState,
    ) {
        let theme = Theme::default();
        terminal
            .draw(|frame| {
                let widget = TranscriptWidget::new(entries, &theme).busy(busy);
                frame.render_stateful_widget(widget, frame.area(), state);
            })
            .unwrap();
    }

    #[test]
    fn test_welcome_shown_before_first_message() {
        let mut terminal = create_test_terminal(60, 12);
        let mut state = TranscriptState::new();

        draw(&mut terminal, &[], false, &mut state);

        let content = buffer_text(&terminal);
        assert!(content.contains("How can I help you today?"));
        assert!(content.contains("Try asking about the weather today."));
        assert!(content.contains("What's the latest news?"));
    }

    #[test]
    fn test_entries_render_with_origin_badges() {
        let entries = vec![
            TranscriptEntry::user("hello"),
            TranscriptEntry::assistant("hi there"),
        ];
        let mut terminal = create_test_terminal(60, 12);
        let mut state = TranscriptState::new();

        draw(&mut terminal, &entries, false, &mut state);

        let content = buffer_text(&terminal);
        assert!(content.contains("[you]"));
        assert!(content.contains("[assistant]"));
        assert!(content.contains("hello"));
        assert!(content.contains("hi there"));
        assert!(!content.contains("How can I help you today?"));
    }

    #[test]
    fn test_exactly_one_loading_notice_while_busy() {
        let entries = vec![TranscriptEntry::user("hello")];
        let mut terminal = create_test_terminal(80, 12);
        let mut state = TranscriptState::new();

        draw(&mut terminal, &entries, true, &mut state);

        let content = buffer_text(&terminal);
        assert_eq!(content.matches("Loading your answer").count(), 1);
    }

    #[test]
    fn test_no_loading_notice_when_idle() {
        let entries = vec![
            TranscriptEntry::user("hello"),
            TranscriptEntry::assistant("hi there"),
        ];
        let mut terminal = create_test_terminal(80, 12);
        let mut state = TranscriptState::new();

        draw(&mut terminal, &entries, false, &mut state);

        let content = buffer_text(&terminal);
        assert_eq!(content.matches("Loading your answer").count(), 0);
    }

    #[test]
    fn test_spinner_frame_cycles() {
        let theme = Theme::default();
        let entries = vec![TranscriptEntry::user("hello")];

        let mut terminal = create_test_terminal(40, 10);
        let mut state = TranscriptState::new();
        terminal
            .draw(|frame| {
                let widget = TranscriptWidget::new(&entries, &theme)
                    .busy(true)
                    .spinner_frame(1);
                frame.render_stateful_widget(widget, frame.area(), &mut state);
            })
            .unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("/ [assistant]"));
    }

    #[test]
    fn test_follow_pins_to_bottom() {
        let entries: Vec<TranscriptEntry> = (0..20)
            .map(|i| TranscriptEntry::user(format!("message {i}")))
            .collect();
        let mut terminal = create_test_terminal(40, 10);
        let mut state = TranscriptState::new();

        draw(&mut terminal, &entries, false, &mut state);

        assert!(state.is_following());
        assert!(state.at_bottom());
        assert!(state.offset() > 0);
        assert!(buffer_text(&terminal).contains("message 19"));
    }

    #[test]
    fn test_detached_view_holds_position_across_draws() {
        let entries: Vec<TranscriptEntry> = (0..20)
            .map(|i| TranscriptEntry::user(format!("message {i}")))
            .collect();
        let mut terminal = create_test_terminal(40, 10);
        let mut state = TranscriptState::new();

        draw(&mut terminal, &entries, false, &mut state);
        state.scroll_up(5);
        let held = state.offset();

        draw(&mut terminal, &entries, false, &mut state);
        assert_eq!(state.offset(), held);
        assert!(!state.is_following());
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let entries = vec![TranscriptEntry::user("hello")];
        let mut terminal = create_test_terminal(1, 1);
        let mut state = TranscriptState::new();

        draw(&mut terminal, &entries, true, &mut state);
    }
}
