//! Public types for the proxy API
use serde::{Deserialize, Serialize};

/// Body of every non-2xx response from the relay.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ErrorEnvelope {
    pub error: String,
    pub details: String,
    // Upstream status, set when the error came from the LLM API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_code: Option<u16>,
    // Transport failure class: "timeout", "connect" or "request"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(error: &str, details: &str) -> Self {
        Self {
            error: error.to_string(),
            details: details.to_string(),
            http_code: None,
            code: None,
        }
    }
}
