use anyhow::Result;

use crate::core::AppConfig;

/// Immutable state shared by every request. The HTTP client pools
/// upstream connections; nothing here is mutated after startup.
pub struct AppState {
    pub config: AppConfig,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("relaychat/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }
}
