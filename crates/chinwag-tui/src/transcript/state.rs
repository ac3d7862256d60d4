//! Scroll state for the transcript view.

/// Vertical scroll state for the rendered transcript.
///
/// Tracks an offset into the wrapped line list plus a follow flag. While
/// following, the view sticks to the newest lines as the transcript grows.
/// Scrolling up detaches the view; scrolling back to the bottom re-engages
/// follow.
///
/// Line geometry depends on the render width, so the widget reports it back
/// via [`TranscriptState::set_geometry`] on every draw and the offset is
/// clamped there.
#[derive(Debug, Clone)]
pub struct TranscriptState {
    /// Index of the first visible line.
    offset: usize,
    /// Whether the view tracks the newest lines.
    follow: bool,
    /// Total rendered lines, cached from the last draw.
    total_lines: usize,
    /// Viewport height in lines, cached from the last draw.
    viewport: usize,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptState {
    /// Create a new state, following the bottom.
    pub fn new() -> Self {
        Self {
            offset: 0,
            follow: true,
            total_lines: 0,
            viewport: 0,
        }
    }

    /// Current scroll offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether the view is following the newest lines.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Maximum scroll offset for the cached geometry.
    pub fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport)
    }

    /// Whether the viewport currently shows the last line.
    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    /// Scroll up by `lines`, detaching from the bottom.
    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.follow = false;
    }

    /// Scroll down by `lines`, re-engaging follow at the bottom.
    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = (self.offset + lines).min(self.max_offset());
        if self.at_bottom() {
            self.follow = true;
        }
    }

    /// Scroll up by one viewport.
    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport.max(1));
    }

    /// Scroll down by one viewport.
    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport.max(1));
    }

    /// Jump to the first line.
    pub fn jump_to_top(&mut self) {
        self.offset = 0;
        self.follow = false;
    }

    /// Jump to the last line and resume following.
    pub fn jump_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.follow = true;
    }

    /// Record the rendered geometry and reconcile the offset.
    ///
    /// Called by the widget on every draw, after wrapping the transcript to
    /// the current width.
    pub fn set_geometry(&mut self, total_lines: usize, viewport: usize) {
        self.total_lines = total_lines;
        self.viewport = viewport;
        if self.follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }
}
