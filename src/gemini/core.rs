use std::time::Duration;

use axum::body::Bytes;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "model")]
    Model,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

/// Body sent from the chat client to the relay. The relay only
/// checks that `contents` is present and forwards it untouched.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// Sampling parameters the relay attaches to every upstream call.
/// Clients can't override these.
#[derive(Clone, Copy, Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamPayload<'a> {
    contents: &'a Value,
    generation_config: GenerationConfig,
}

/// The raw upstream reply. The body is kept as bytes so a successful
/// response can be handed back to the caller unchanged.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Pull a human readable message out of a Gemini error object,
    /// preferring `error.message` over `error.status`.
    pub fn error_message(&self) -> Option<String> {
        let value: Value = serde_json::from_slice(&self.body).ok()?;
        let error = &value["error"];
        error["message"]
            .as_str()
            .or_else(|| error["status"].as_str())
            .map(str::to_string)
    }
}

pub fn generate_content_url(api_hostname: &str, model: &str) -> String {
    format!(
        "{}/v1/models/{}:generateContent",
        api_hostname.trim_end_matches("/"),
        model
    )
}

/// Forward `contents` to the `generateContent` endpoint along with
/// the fixed generation config. Only transport failures are returned
/// as errors; any HTTP status, including 4xx and 5xx, comes back as
/// an `UpstreamResponse` for the caller to classify.
pub async fn generate_content(
    client: &reqwest::Client,
    contents: &Value,
    api_hostname: &str,
    api_key: &str,
    model: &str,
    timeout: Duration,
) -> Result<UpstreamResponse, reqwest::Error> {
    let payload = UpstreamPayload {
        contents,
        generation_config: GenerationConfig::default(),
    };
    let url = generate_content_url(api_hostname, model);

    tracing::debug!("Forwarding request to {}", url);

    let response = client
        .post(url)
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .timeout(timeout)
        .json(&payload)
        .send()
        .await?;
    let status = response.status();
    let body = response.bytes().await?;

    Ok(UpstreamResponse { status, body })
}
