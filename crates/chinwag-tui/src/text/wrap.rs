//! Text wrapping utilities for ratatui Lines.
//!
//! Provides functions to wrap plain and styled text to fit within a given
//! width.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Wrap a plain text string to the specified width.
/// Returns a vector of wrapped lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    textwrap::wrap(text, width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

/// Wrap a vector of Lines to fit within the specified width.
/// Each line that exceeds the width is split into multiple lines with
/// span styling preserved.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }

    let mut result = Vec::new();
    for line in lines {
        result.extend(wrap_line(line, width));
    }
    result
}

/// Wrap a single Line. Wrap points come from textwrap on the flattened text;
/// styles are reapplied character by character afterwards.
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let flat: String = line.spans.iter().map(|span| span.content.as_ref()).collect();

    // Compare display width, not char count; CJK and emoji take two cells.
    if flat.width() <= width {
        return vec![line];
    }

    let chars: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |ch| (ch, span.style)))
        .collect();
    let mut cursor = 0;
    let mut wrapped = Vec::new();

    for piece in textwrap::wrap(&flat, width) {
        // textwrap swallows the whitespace it breaks on
        while cursor < chars.len()
            && chars[cursor].0.is_whitespace()
            && !piece.starts_with(chars[cursor].0)
        {
            cursor += 1;
        }

        let mut builder = RunBuilder::default();
        for _ in piece.chars() {
            if let Some(&(ch, style)) = chars.get(cursor) {
                builder.push(ch, style);
                cursor += 1;
            }
        }
        wrapped.push(builder.into_line());
    }

    if wrapped.is_empty() {
        wrapped.push(Line::from(""));
    }
    wrapped
}

/// Accumulates characters into spans, starting a new span on style change.
#[derive(Default)]
pub(crate) struct RunBuilder {
    spans: Vec<Span<'static>>,
    run: String,
    style: Option<Style>,
}

impl RunBuilder {
    pub(crate) fn push(&mut self, ch: char, style: Style) {
        match self.style {
            Some(current) if current == style => self.run.push(ch),
            Some(current) => {
                if !self.run.is_empty() {
                    self.spans
                        .push(Span::styled(std::mem::take(&mut self.run), current));
                }
                self.style = Some(style);
                self.run.push(ch);
            }
            None => {
                self.style = Some(style);
                self.run.push(ch);
            }
        }
    }

    pub(crate) fn into_line(mut self) -> Line<'static> {
        if let Some(style) = self.style {
            if !self.run.is_empty() {
                self.spans.push(Span::styled(self.run, style));
            }
        }
        Line::from(self.spans)
    }
}
