//! Application configuration. Bot credentials, destination chat, HTTP settings.
//!
//! Credentials never live in source: they come from the environment (`.env`
//! supported) or an optional config file, are read once at startup and handed
//! to the notifier as an immutable [`NotifierSettings`].

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Telegram Bot API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Per-request timeout for lead delivery.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Deserialize, Default)]
pub struct AppConfig {
    /// Bot token from @BotFather. Read from BODYSHOP_BOT_TOKEN.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Destination chat (user, group or channel id). Read from BODYSHOP_CHAT_ID.
    #[serde(default)]
    pub chat_id: Option<String>,

    /// Bot API root. Read from BODYSHOP_API_BASE_URL.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Request timeout in seconds (default 15). Read from BODYSHOP_REQUEST_TIMEOUT_SECS.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("BODYSHOP_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        // environment overrides the file
        c = c.add_source(config::Environment::with_prefix("BODYSHOP").try_parsing(true));
        c.build()?.try_deserialize()
    }

    /// Bot token. Empty values count as unset.
    pub fn bot_token(&self) -> Option<String> {
        self.bot_token.clone().filter(|s| !s.trim().is_empty())
    }

    /// Chat id. Empty values count as unset.
    pub fn chat_id(&self) -> Option<String> {
        self.chat_id.clone().filter(|s| !s.trim().is_empty())
    }

    pub fn api_base_url_or_default(&self) -> String {
        self.api_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    /// Timeout in seconds, at least 1. A zero timeout would fail every request.
    pub fn request_timeout_secs_or_default(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
            .max(1)
    }

    /// True if both bot token and chat id are present.
    pub fn is_notifier_configured(&self) -> bool {
        self.bot_token().is_some() && self.chat_id().is_some()
    }

    /// Immutable notifier settings, or `None` when token or chat id is missing.
    pub fn notifier_settings(&self) -> Option<NotifierSettings> {
        let settings = NotifierSettings::new(self.bot_token()?, self.chat_id()?)
            .with_api_base_url(self.api_base_url_or_default())
            .with_timeout(Duration::from_secs(self.request_timeout_secs_or_default()));
        Some(settings)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Everything the Telegram notifier needs. Built once, never mutated.
#[derive(Clone)]
pub struct NotifierSettings {
    bot_token: String,
    chat_id: String,
    api_base_url: String,
    request_timeout: Duration,
}

impl NotifierSettings {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Full URL of a Bot API method, e.g. `https://api.telegram.org/bot<token>/sendMessage`.
    pub fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.bot_token,
            method
        )
    }
}

impl fmt::Debug for NotifierSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierSettings")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
