//! Markdown rendering using pulldown-cmark.
//!
//! Provides [`render_markdown`] to convert markdown text (assistant replies)
//! to styled ratatui Lines, wrapped to the target width.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::Theme;

use super::wrap::wrap_lines;

/// Render markdown text to styled ratatui Lines.
///
/// Lines longer than `width` are wrapped with styling preserved; pass 0 to
/// skip wrapping.
pub fn render_markdown(input: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(input, options);

    let mut renderer = MarkdownRenderer::new(theme);
    for event in parser {
        renderer.handle(event);
    }
    let lines = renderer.finish();

    if width == 0 {
        lines
    } else {
        wrap_lines(lines, width)
    }
}

/// Internal renderer that folds pulldown-cmark events into lines.
struct MarkdownRenderer<'a> {
    /// Theme the element styles derive from.
    theme: &'a Theme,
    /// Accumulated output lines.
    lines: Vec<Line<'static>>,
    /// Stack of active inline styles for nested formatting.
    style_stack: Vec<Style>,
    /// Current line being built.
    current: Vec<Span<'static>>,
    /// Nesting depth of the surrounding lists.
    list_depth: usize,
    /// Whether we're inside a fenced or indented code block.
    in_code_block: bool,
    /// Whether we're inside a blockquote.
    in_blockquote: bool,
    /// List marker waiting to be prepended to the next text.
    pending_marker: Option<String>,
    /// Task checkbox state, when the current item carries one.
    pending_checkbox: Option<bool>,
}

impl<'a> MarkdownRenderer<'a> {
    fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            style_stack: Vec::new(),
            current: Vec::new(),
            list_depth: 0,
            in_code_block: false,
            in_blockquote: false,
            pending_marker: None,
            pending_checkbox: None,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(&tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => {
                let span = Span::styled(format!("`{code}`"), self.code_style());
                self.current.push(span);
            }
            // Soft break = space
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.flush_line(),
            Event::TaskListMarker(checked) => {
                self.pending_checkbox = Some(checked);
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: &Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_line();
                let style = self.heading_style(*level);
                self.style_stack.push(style);
            }
            Tag::Emphasis => self
                .style_stack
                .push(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self
                .style_stack
                .push(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self
                .style_stack
                .push(Style::default().add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { .. } => self.style_stack.push(
                Style::default()
                    .fg(self.theme.info)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Tag::BlockQuote => {
                self.flush_line();
                self.in_blockquote = true;
            }
            Tag::List(_) => {
                self.flush_line();
                self.list_depth += 1;
            }
            Tag::Item => {
                self.flush_line();
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.pending_marker = Some(format!("{indent}\u{2022} "));
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.flush_line();
                self.style_stack.pop();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.style_stack.pop();
            }
            TagEnd::CodeBlock => {
                self.flush_line();
                self.in_code_block = false;
            }
            TagEnd::BlockQuote => {
                self.flush_line();
                self.in_blockquote = false;
            }
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
            }
            TagEnd::Item => {
                self.flush_line();
                self.pending_checkbox = None;
            }
            TagEnd::Paragraph => {
                self.flush_line();
                // Blank line between paragraphs
                self.lines.push(Line::from(""));
            }
            _ => {}
        }
    }

    /// Headings step down through the theme accents by level.
    fn heading_style(&self, level: HeadingLevel) -> Style {
        let accent = match level {
            HeadingLevel::H1 => self.theme.primary,
            HeadingLevel::H2 => self.theme.text,
            _ => self.theme.subtext,
        };
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    }

    /// Inline code and code block lines share one look.
    fn code_style(&self) -> Style {
        Style::default()
            .fg(self.theme.secondary)
            .bg(self.theme.surface)
    }

    fn marker_style(&self) -> Style {
        Style::default().fg(self.theme.muted)
    }

    fn quote_style(&self) -> Style {
        Style::default()
            .fg(self.theme.subtext)
            .add_modifier(Modifier::ITALIC)
    }

    fn push_text(&mut self, text: &str) {
        if self.in_code_block {
            // Each code line becomes its own output line, indented
            for line in text.lines() {
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.current
                    .push(Span::styled(format!("{indent}  {line}"), self.code_style()));
                self.flush_line();
            }
            return;
        }

        if let Some(marker) = self.pending_marker.take() {
            self.current
                .push(Span::styled(marker, self.marker_style()));
            if let Some(checked) = self.pending_checkbox.take() {
                let checkbox = if checked { "[x] " } else { "[ ] " };
                self.current
                    .push(Span::styled(checkbox, self.marker_style()));
            }
        }

        if self.in_blockquote && self.current.is_empty() {
            self.current
                .push(Span::styled("> ".to_string(), self.quote_style()));
        }

        let style = self.current_style();
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn current_style(&self) -> Style {
        let mut style = Style::default().fg(self.theme.text);
        for s in &self.style_stack {
            style = style.patch(*s);
        }
        style
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.lines.push(Line::from(spans));
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        // The last paragraph leaves a trailing blank line; drop it
        if self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}
