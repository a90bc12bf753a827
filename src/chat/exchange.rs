use std::time::Duration;

use async_trait::async_trait;
use handlebars::Handlebars;
use http::StatusCode;
use serde_json::Value;

use super::error::{ExchangeError, MAX_DETAIL_CHARS, truncate_chars};
use super::prompt::{DEFAULT_INSTRUCTIONS, question_prompt, templates};
use crate::gemini::{Content, GenerateContentRequest};

/// How long a question may take end to end before it is abandoned.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(45);

/// One question in, one answer out. `ChatWidget` only depends on this
/// so it can be driven without a network.
#[async_trait]
pub trait Exchange: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String, ExchangeError>;
}

/// Talks to the relay proxy. Each question is sent on its own with
/// no earlier turns attached.
///
/// Use `ProxyClientBuilder` to construct a `ProxyClient`.
pub struct ProxyClient {
    http: reqwest::Client,
    proxy_url: String,
    deadline: Duration,
    instructions: String,
    templates: Handlebars<'static>,
}

impl ProxyClient {
    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    async fn send(&self, request: &GenerateContentRequest) -> Result<String, ExchangeError> {
        let response = self
            .http
            .post(&self.proxy_url)
            .json(request)
            .send()
            .await
            .map_err(ExchangeError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(ExchangeError::Network)?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        extract_answer(&body)
    }
}

#[async_trait]
impl Exchange for ProxyClient {
    async fn ask(&self, question: &str) -> Result<String, ExchangeError> {
        let prompt = question_prompt(&self.templates, &self.instructions, question)
            .map_err(|e| ExchangeError::Unknown(e.to_string()))?;
        let request = GenerateContentRequest {
            contents: vec![Content::user(&prompt)],
        };

        tracing::debug!("Sending question to {}", self.proxy_url);

        // Dropping the send future on expiry cancels the request
        let result = match tokio::time::timeout(self.deadline, self.send(&request)).await {
            Ok(result) => result,
            Err(_) => Err(ExchangeError::Timeout(self.deadline)),
        };

        if let Err(e) = &result {
            tracing::error!("Chat exchange failed ({:?}): {}", e.kind(), e);
        }
        result
    }
}

pub struct ProxyClientBuilder {
    proxy_url: String,
    deadline: Duration,
    instructions: String,
}

impl ProxyClientBuilder {
    pub fn new(proxy_url: &str) -> Self {
        Self {
            proxy_url: proxy_url.to_string(),
            deadline: DEFAULT_DEADLINE,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn instructions(mut self, instructions: &str) -> Self {
        self.instructions = instructions.to_string();
        self
    }

    pub fn build(self) -> ProxyClient {
        ProxyClient {
            http: reqwest::Client::new(),
            proxy_url: self.proxy_url,
            deadline: self.deadline,
            instructions: self.instructions,
            templates: templates(),
        }
    }
}

/// Find a message in a relay error envelope (`error` and `details`)
/// or a raw upstream error object (`error.message`).
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match (value["error"].as_str(), value["details"].as_str()) {
        (Some(error), Some(details)) => Some(format!("{}: {}", error, details)),
        (Some(error), None) => Some(error.to_string()),
        (None, Some(details)) => Some(details.to_string()),
        (None, None) => value["error"]["message"].as_str().map(str::to_string),
    }
}

fn status_error(status: StatusCode, body: &str) -> ExchangeError {
    let message = error_message(body)
        .unwrap_or_else(|| truncate_chars(body, MAX_DETAIL_CHARS).to_string());

    if status.is_client_error() {
        ExchangeError::ClientStatus { status, message }
    } else if status.is_server_error() {
        ExchangeError::ServerStatus { status, message }
    } else {
        ExchangeError::Unknown(format!("Unexpected status {}: {}", status, message))
    }
}

/// Pull the first candidate's first text part out of a success body.
fn extract_answer(body: &str) -> Result<String, ExchangeError> {
    let value: Value = serde_json::from_str(body).map_err(ExchangeError::MalformedResponse)?;

    let candidate = value["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .ok_or(ExchangeError::EmptyOutput("no candidates"))?;
    let part = candidate["content"]["parts"]
        .as_array()
        .and_then(|parts| parts.first())
        .ok_or(ExchangeError::EmptyOutput("no content parts"))?;
    let text = part["text"]
        .as_str()
        .ok_or(ExchangeError::EmptyOutput("missing text"))?
        .trim();

    if text.is_empty() {
        return Err(ExchangeError::EmptyOutput("blank text"));
    }

    Ok(text.to_string())
}
