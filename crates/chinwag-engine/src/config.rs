//! Completion service configuration.
//!
//! Configuration is built explicitly at the composition root and passed into
//! [`crate::completion::CompletionClient::new`]; nothing in the engine reads
//! environment variables or files.

/// Default service base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Where and how to reach the completion service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the service.
    pub endpoint: String,

    /// Model identifier, inserted into the request path.
    pub model: String,

    /// API credential, sent as the `key` query parameter. Never validated or
    /// refreshed here.
    pub api_key: String,
}

impl Config {
    /// Create a configuration for the default public endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            api_key: api_key.into(),
        }
    }

    /// Full URL for a `generateContent` request.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::new("secret");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_key, "secret");
    }

    #[test]
    fn test_generate_url() {
        let config = Config::new("secret");
        assert_eq!(
            config.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent?key=secret"
        );
    }

    #[test]
    fn test_generate_url_trims_trailing_slash() {
        let config = Config {
            endpoint: "http://localhost:8080/".into(),
            model: "test-model".into(),
            api_key: "k".into(),
        };
        assert_eq!(
            config.generate_url(),
            "http://localhost:8080/v1beta/models/test-model:generateContent?key=k"
        );
    }
}
