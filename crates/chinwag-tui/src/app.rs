//! Application state and update logic for the chinwag TUI.

use chinwag_engine::{ChatSession, CompletionClient, CompletionError, Config, TranscriptEntry};
use tokio::sync::mpsc;

use crate::event::Action;
use crate::transcript::TranscriptState;
use crate::ui::widgets::TextInputState;

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Conversation state: transcript plus busy flag.
    pub session: ChatSession,

    /// Text input state for the draft message.
    pub input_state: TextInputState,

    /// Scroll state for the transcript pane.
    pub transcript_state: TranscriptState,

    /// Tick counter for animations.
    pub tick: usize,

    /// Notification message (displayed temporarily, cleared after some ticks).
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Client for the completion service.
    client: CompletionClient,

    /// Channel receiver for the outcome of the in-flight request.
    completion_rx: Option<mpsc::UnboundedReceiver<Result<String, CompletionError>>>,
}

impl App {
    /// Create a new app instance talking to the configured service.
    pub fn new(config: Config) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            session: ChatSession::new(),
            input_state: TextInputState::new(),
            transcript_state: TranscriptState::new(),
            tick: 0,
            notification: None,
            notification_ttl: 0,
            client: CompletionClient::new(config),
            completion_rx: None,
        }
    }

    /// Model name shown in the status bar.
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Transcript entries for rendering.
    pub fn entries(&self) -> &[TranscriptEntry] {
        self.session.transcript().entries()
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        // Global actions
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        match action {
            Action::ScrollUp => self.transcript_state.scroll_up(1),
            Action::ScrollDown => self.transcript_state.scroll_down(1),
            Action::PageUp => self.transcript_state.page_up(),
            Action::PageDown => self.transcript_state.page_down(),
            Action::JumpTop => self.transcript_state.jump_to_top(),
            Action::JumpBottom => self.transcript_state.jump_to_bottom(),
            _ => {}
        }
    }

    /// Submit the current draft.
    ///
    /// Rejected with a notification while a request is outstanding. A draft
    /// that trims to nothing is left untouched. Otherwise the draft is taken,
    /// the user entry is appended, and the request runs on a background task
    /// whose outcome arrives through [`App::poll_completions`].
    pub fn submit(&mut self) {
        if self.session.is_busy() {
            self.set_notification("Still waiting for the reply".to_string());
            return;
        }
        if self.input_state.content().trim().is_empty() {
            return;
        }

        let draft = self.input_state.submit();
        let Some(prompt) = self.session.begin(&draft) else {
            return;
        };
        self.transcript_state.jump_to_bottom();

        let (tx, rx) = mpsc::unbounded_channel();
        self.completion_rx = Some(rx);

        let client = self.client.clone();
        tokio::spawn(async move {
            // Ignore error if receiver was dropped (app quit)
            let _ = tx.send(client.generate(&prompt).await);
        });
    }

    /// Pick up the outcome of the in-flight request, if it has arrived.
    ///
    /// The background task is the only sender; the session applies the
    /// outcome here, on the event loop, so the transcript has a single
    /// writer.
    pub fn poll_completions(&mut self) {
        let Some(rx) = &mut self.completion_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.completion_rx = None;
                self.session.resolve(outcome);
            }
            Err(mpsc::error::TryRecvError::Disconnected) => {
                // Task ended without reporting back; resolve as a failure
                // so the session cannot stay busy.
                self.completion_rx = None;
                self.session.resolve(Err(CompletionError::Interrupted));
            }
            Err(mpsc::error::TryRecvError::Empty) => {}
        }
    }

    /// Set a temporary notification message.
    fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        // Display for ~3 seconds at 4 Hz tick rate (250ms) = 12 ticks
        self.notification_ttl = 12;
    }

    /// Increment tick counter and update time-based state.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        // Clear notification after TTL expires
        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chinwag_engine::{Origin, FALLBACK_REPLY};

    fn test_app() -> App {
        // Endpoint that refuses connections, for requests that must fail.
        App::new(Config {
            endpoint: "http://127.0.0.1:9".to_string(),
            model: "gemini-pro".to_string(),
            api_key: "test-key".to_string(),
        })
    }

    async fn drain(app: &mut App) {
        for _ in 0..200 {
            app.poll_completions();
            if !app.session.is_busy() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("request never resolved");
    }

    #[test]
    fn test_blank_submit_changes_nothing() {
        let mut app = test_app();
        app.input_state.insert_str("   ");
        app.submit();

        assert!(!app.session.is_busy());
        assert!(app.entries().is_empty());
        assert_eq!(app.input_state.content(), "   ");
    }

    #[tokio::test]
    async fn test_submit_appends_user_entry_and_locks() {
        let mut app = test_app();
        app.input_state.insert_str("hello");
        app.submit();

        assert!(app.session.is_busy());
        assert!(app.input_state.is_empty());
        assert_eq!(app.entries().len(), 1);
        assert_eq!(app.entries()[0].origin, Origin::User);
        assert_eq!(app.entries()[0].text, "hello");

        drain(&mut app).await;
        assert!(!app.session.is_busy());
        assert_eq!(app.entries().len(), 2);
        assert_eq!(app.entries()[1].origin, Origin::Assistant);
        assert_eq!(app.entries()[1].text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_submit_while_busy_is_rejected() {
        let mut app = test_app();
        app.input_state.insert_str("first");
        app.submit();
        assert!(app.session.is_busy());

        app.input_state.insert_str("second");
        app.submit();

        // The second draft is refused and left in place.
        assert_eq!(app.entries().len(), 1);
        assert_eq!(app.input_state.content(), "second");
        assert!(app.notification.is_some());

        drain(&mut app).await;
        assert_eq!(app.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_disconnected_task_resolves_with_fallback() {
        let mut app = test_app();
        app.input_state.insert_str("hello");
        app.submit();

        // Swap in a channel whose sender is already gone.
        app.completion_rx = Some(mpsc::unbounded_channel().1);
        app.poll_completions();

        assert!(!app.session.is_busy());
        assert_eq!(
            app.entries().last().map(|e| e.text.as_str()),
            Some(FALLBACK_REPLY)
        );
    }

    #[test]
    fn test_help_overlay_toggles_and_blocks_quit() {
        let mut app = test_app();
        app.handle_action(Action::Help);
        assert!(app.show_help);

        // Quit closes the overlay first.
        app.handle_action(Action::Quit);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_any_action_closes_help() {
        let mut app = test_app();
        app.handle_action(Action::Help);
        app.handle_action(Action::ScrollUp);
        assert!(!app.show_help);
    }

    #[test]
    fn test_scroll_actions_route_to_transcript() {
        let mut app = test_app();
        app.transcript_state.set_geometry(50, 10);
        assert_eq!(app.transcript_state.offset(), 40);

        app.handle_action(Action::ScrollUp);
        assert_eq!(app.transcript_state.offset(), 39);
        assert!(!app.transcript_state.is_following());

        app.handle_action(Action::JumpBottom);
        assert!(app.transcript_state.is_following());
    }

    #[test]
    fn test_notification_expires_after_ttl() {
        let mut app = test_app();
        app.set_notification("saved".to_string());
        assert!(app.notification.is_some());

        for _ in 0..12 {
            app.tick();
        }
        assert!(app.notification.is_none());
    }
}
