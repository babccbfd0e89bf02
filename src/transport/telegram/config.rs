/// Default Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Runtime configuration describing how to reach the Bot API.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather.
    pub token: String,
    /// Bot API server root.
    pub api_url: String,
}

impl TelegramConfig {
    /// Construct a configuration for the public Bot API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.into(),
        }
    }

    /// Point the client at another Bot API server (self-hosted or test double).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Base URL for method calls, e.g. `https://api.telegram.org/bot<token>`.
    pub(super) fn method_base(&self) -> String {
        format!("{}/bot{}", self.api_url.trim_end_matches('/'), self.token)
    }

    /// Base URL for file downloads, e.g. `https://api.telegram.org/file/bot<token>`.
    pub(super) fn file_base(&self) -> String {
        format!("{}/file/bot{}", self.api_url.trim_end_matches('/'), self.token)
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}
