//! chinwag-tui: Terminal UI for the chinwag chatbot
//!
//! This crate provides the TUI layer for chinwag, including:
//! - Conversation pane with transcript and draft input
//! - Markdown rendering for assistant replies
//! - Catppuccin themes, status bar, and help overlay

mod app;
mod conversation;
mod event;
mod text;
mod theme;
mod transcript;
mod ui;

pub use app::App;
pub use chinwag_engine;
pub use event::{Action, Event, EventHandler};
pub use theme::Theme;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, stdout};

use chinwag_engine::Config;

use crate::conversation::ConversationPane;
use crate::ui::layout::{centered_fixed, main_layout};
use crate::ui::widgets::{KeyHint, StatusBar};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_tui(config: Config, theme: Theme) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    // Create event handler (4 Hz tick rate = 250ms)
    let mut events = EventHandler::new(250);

    // Main loop
    let result = run_loop(&mut terminal, &mut app, &mut events, &theme).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    theme: &Theme,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Draw
        terminal.draw(|frame| draw_ui(frame, app, theme))?;

        // Handle events
        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    if !app.show_help && handle_conversation_key(app, key) {
                        continue; // Key was handled by the draft input
                    }
                    let action = event::key_to_action(key);
                    app.handle_action(action);
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => {
                            app.handle_action(Action::ScrollUp);
                        }
                        MouseEventKind::ScrollDown => {
                            app.handle_action(Action::ScrollDown);
                        }
                        _ => {}
                    }
                }
                Event::Tick => {
                    app.tick();
                }
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        // Check for a completed request
        app.poll_completions();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle key input for the draft input area.
/// Returns true if the key was handled (should not be processed as action).
fn handle_conversation_key(app: &mut App, key: crossterm::event::KeyEvent) -> bool {
    use crossterm::event::{KeyCode, KeyModifiers};

    // Let the action handler deal with Ctrl+C, Ctrl+H, etc.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    // Editing is locked while a request is outstanding. Enter still gets
    // a busy notice from submit; everything else falls through.
    if app.session.is_busy() {
        return match key.code {
            KeyCode::Enter => {
                app.submit();
                true
            }
            _ => false,
        };
    }

    match key.code {
        // Special keys that should be handled as actions
        KeyCode::Esc => false,

        // Enter sends the draft
        KeyCode::Enter => {
            app.submit();
            true
        }

        // Text input
        KeyCode::Char(c) => {
            app.input_state.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.input_state.backspace();
            true
        }
        KeyCode::Delete => {
            app.input_state.delete();
            true
        }
        KeyCode::Left => {
            app.input_state.move_left();
            true
        }
        KeyCode::Right => {
            app.input_state.move_right();
            true
        }
        KeyCode::Home => {
            // Cursor motion while drafting, transcript jump otherwise
            if app.input_state.is_empty() {
                false
            } else {
                app.input_state.move_home();
                true
            }
        }
        KeyCode::End => {
            if app.input_state.is_empty() {
                false
            } else {
                app.input_state.move_end();
                true
            }
        }
        KeyCode::Up => {
            // History navigation when the input is empty or already
            // showing a recalled draft
            if app.input_state.is_empty() || app.input_state.is_browsing_history() {
                app.input_state.history_prev();
                true
            } else {
                false // Let the action handler scroll the transcript
            }
        }
        KeyCode::Down => {
            if app.input_state.is_empty() || app.input_state.is_browsing_history() {
                app.input_state.history_next();
                true
            } else {
                false
            }
        }

        _ => false,
    }
}

/// Draw the full UI: conversation pane, status bar, optional help overlay.
fn draw_ui(frame: &mut Frame<'_>, app: &mut App, theme: &Theme) {
    let area = frame.area();
    let (main_area, status_area) = main_layout(area);

    let right_text = match &app.notification {
        Some(note) => note.clone(),
        None => app.model().to_string(),
    };

    let pane = ConversationPane::new(app.session.transcript().entries(), &app.input_state, theme)
        .busy(app.session.is_busy())
        .spinner_frame(app.tick)
        .focused(true);
    frame.render_stateful_widget(pane, main_area, &mut app.transcript_state);

    let status_bar = StatusBar::new("CHAT", theme)
        .hints(vec![
            KeyHint::new("Enter", "send"),
            KeyHint::new("Ctrl+H", "help"),
            KeyHint::new("Esc", "quit"),
        ])
        .right(&right_text);
    frame.render_widget(status_bar, status_area);

    if app.show_help {
        render_help_overlay(frame, area, theme);
    }
}

/// Render the help overlay over the current screen.
fn render_help_overlay(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let overlay = centered_fixed(58, 13, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .title(" Help ")
        .title_style(Style::default().fg(theme.text))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.surface));

    let bindings = [
        ("Enter", "send the draft"),
        ("Up/Down", "recall sent drafts, or scroll"),
        ("PgUp/PgDn", "scroll a page at a time"),
        ("Home/End", "cursor, or jump to top/bottom"),
        ("Ctrl+H", "toggle this help"),
        ("Esc / Ctrl+C", "quit"),
    ];

    let mut lines = vec![Line::default()];
    for (key, what) in bindings {
        lines.push(Line::from(vec![
            Span::styled(format!(" {key:<14}"), Style::default().fg(theme.primary)),
            Span::styled(what, Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::styled(
        " chinwag can make mistakes. Consider checking important information.",
        Style::default().fg(theme.muted),
    ));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        overlay,
    );
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
