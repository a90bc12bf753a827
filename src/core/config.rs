use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Relay configuration. The upstream credential only ever comes from
/// the environment and is never sent to clients.
#[derive(Clone)]
pub struct AppConfig {
    pub gemini_api_hostname: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub upstream_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let gemini_api_key =
            env::var("GEMINI_API_KEY").context("Missing env var GEMINI_API_KEY")?;
        let gemini_api_hostname = env::var("RELAYCHAT_GEMINI_HOST")
            .unwrap_or_else(|_| DEFAULT_GEMINI_HOST.to_string());
        let gemini_model = env::var("RELAYCHAT_GEMINI_MODEL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let upstream_timeout_secs = match env::var("RELAYCHAT_UPSTREAM_TIMEOUT_SECS") {
            Ok(secs) => secs
                .parse::<u64>()
                .context("RELAYCHAT_UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        Ok(Self {
            gemini_api_hostname,
            gemini_api_key,
            gemini_model,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
        })
    }
}

// Keep the key out of logs
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("gemini_api_hostname", &self.gemini_api_hostname)
            .field("gemini_api_key", &"<redacted>")
            .field("gemini_model", &self.gemini_model)
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}
