//! Conversation session state and the submit/resolve flow.
//!
//! A submission has two halves: [`ChatSession::begin`] appends the user entry
//! and marks the session busy, [`ChatSession::resolve`] appends the assistant
//! entry (or the fallback reply) and clears the flag. The split keeps the
//! transcript single-writer: the event loop calls both halves, and the
//! spawned request task only ships a `Result` back over a channel.

use crate::completion::CompletionError;
use crate::transcript::{Transcript, TranscriptEntry};

/// Assistant reply appended when a completion request fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry - Something went wrong. Please try again!";

/// A single conversation: the append-only transcript plus the busy flag
/// guarding the one-at-a-time outstanding request.
#[derive(Debug, Default)]
pub struct ChatSession {
    transcript: Transcript,
    busy: bool,
}

impl ChatSession {
    /// Create an idle session with an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a submission.
    ///
    /// Returns the prompt to send to the completion service, or `None` when
    /// the draft is blank after trimming or a request is already outstanding.
    /// On `Some`, the user entry has already been appended (optimistically,
    /// before any network traffic) and the session stays busy until
    /// [`ChatSession::resolve`] is called.
    pub fn begin(&mut self, draft: &str) -> Option<String> {
        if self.busy || draft.trim().is_empty() {
            return None;
        }
        self.transcript.push(TranscriptEntry::user(draft));
        self.busy = true;
        Some(draft.to_string())
    }

    /// Finish a submission with the outcome of the completion request.
    ///
    /// Success appends the generated text; any failure appends
    /// [`FALLBACK_REPLY`] with the cause logged for diagnostics, never
    /// surfaced. The session is idle afterwards either way.
    pub fn resolve(&mut self, outcome: Result<String, CompletionError>) {
        let text = match outcome {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("completion request failed: {e}");
                FALLBACK_REPLY.to_string()
            }
        };
        self.transcript.push(TranscriptEntry::assistant(text));
        self.busy = false;
    }

    /// Whether a completion request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The conversation so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionClient;
    use crate::config::Config;
    use crate::transcript::Origin;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_blank_draft_is_a_noop() {
        let mut session = ChatSession::new();
        assert!(session.begin("").is_none());
        assert!(session.begin("   \t\n").is_none());
        assert!(session.transcript().is_empty());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_begin_appends_user_entry_and_sets_busy() {
        let mut session = ChatSession::new();
        let prompt = session.begin("hello").unwrap();
        assert_eq!(prompt, "hello");
        assert!(session.is_busy());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript().entries()[0].origin, Origin::User);
        assert_eq!(session.transcript().entries()[0].text, "hello");
    }

    #[test]
    fn test_begin_keeps_raw_draft_text() {
        let mut session = ChatSession::new();
        let prompt = session.begin("  padded  ").unwrap();
        assert_eq!(prompt, "  padded  ");
        assert_eq!(session.transcript().entries()[0].text, "  padded  ");
    }

    #[test]
    fn test_begin_rejected_while_busy() {
        let mut session = ChatSession::new();
        session.begin("first").unwrap();
        assert!(session.begin("second").is_none());
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn test_resolve_success_appends_assistant_entry() {
        let mut session = ChatSession::new();
        session.begin("hello").unwrap();
        session.resolve(Ok("hi there".into()));

        assert!(!session.is_busy());
        let entries = session.transcript().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].origin, Origin::User);
        assert_eq!(entries[0].text, "hello");
        assert_eq!(entries[1].origin, Origin::Assistant);
        assert_eq!(entries[1].text, "hi there");
    }

    #[test]
    fn test_resolve_failure_appends_fallback() {
        let mut session = ChatSession::new();
        session.begin("hello").unwrap();
        session.resolve(Err(CompletionError::NoCandidates));

        assert!(!session.is_busy());
        let entries = session.transcript().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].origin, Origin::Assistant);
        assert_eq!(entries[1].text, FALLBACK_REPLY);
    }

    #[test]
    fn test_session_usable_again_after_resolve() {
        let mut session = ChatSession::new();
        session.begin("one").unwrap();
        session.resolve(Ok("reply".into()));
        assert!(session.begin("two").is_some());
        assert_eq!(session.transcript().len(), 3);
    }

    fn test_client(server: &MockServer) -> CompletionClient {
        CompletionClient::new(Config {
            endpoint: server.uri(),
            model: "gemini-pro".into(),
            api_key: "test-key".into(),
        })
    }

    #[tokio::test]
    async fn test_full_flow_with_mocked_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "hi there" }] } }]
            })))
            .mount(&server)
            .await;

        let mut session = ChatSession::new();
        let client = test_client(&server);

        let prompt = session.begin("hello").unwrap();
        let outcome = client.generate(&prompt).await;
        session.resolve(outcome);

        assert!(!session.is_busy());
        let entries = session.transcript().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "hello");
        assert_eq!(entries[1].text, "hi there");
    }

    #[tokio::test]
    async fn test_full_flow_with_failing_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut session = ChatSession::new();
        let client = test_client(&server);

        let prompt = session.begin("hello").unwrap();
        let outcome = client.generate(&prompt).await;
        session.resolve(outcome);

        assert!(!session.is_busy());
        let entries = session.transcript().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_full_flow_with_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let mut session = ChatSession::new();
        let client = test_client(&server);

        let prompt = session.begin("hello").unwrap();
        let outcome = client.generate(&prompt).await;
        session.resolve(outcome);

        let entries = session.transcript().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].text, FALLBACK_REPLY);
    }
}
