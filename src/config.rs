//! Connection settings for a pretalx instance.
//!
//! Values come from command-line flags, then `PRETALX_*` environment
//! variables (optionally loaded from a `.env` file), then the defaults below.

use std::time::Duration;
use url::Url;

use crate::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://pretalx.fosdem.org";
pub const DEFAULT_EVENT: &str = "fosdem-2024";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub event: String,
    pub auth_token: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            event: DEFAULT_EVENT.to_string(),
            auth_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            event: event.into(),
            ..Self::default()
        }
    }

    /// Sets the API token. An empty string means "no token".
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn event_root(&self) -> String {
        format!(
            "{}/api/events/{}",
            self.base_url.trim_end_matches('/'),
            self.event
        )
    }

    pub fn submissions_url(&self) -> String {
        format!("{}/submissions", self.event_root())
    }

    /// Review listing filtered to a single submission code.
    pub fn reviews_url(&self, submission_code: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &format!("{}/reviews", self.event_root()),
            &[("submission__code", submission_code)],
        )?;
        Ok(url.into())
    }
}
