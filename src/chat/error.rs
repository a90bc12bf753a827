use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

/// Longest excerpt of a raw error that is ever shown to the user or
/// used as a fallback error message.
pub const MAX_DETAIL_CHARS: usize = 200;

/// Why a question didn't produce an answer.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("Proxy rejected the request ({status}): {message}")]
    ClientStatus { status: StatusCode, message: String },

    #[error("Service error ({status}): {message}")]
    ServerStatus { status: StatusCode, message: String },

    #[error("Empty or invalid model output: {0}")]
    EmptyOutput(&'static str),

    #[error("Request was cancelled before it completed")]
    Cancelled,

    #[error("{0}")]
    Unknown(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    Network,
    MalformedResponse,
    ClientError,
    ServerError,
    EmptyOutput,
    Unknown,
}

const UNKNOWN_MESSAGE: &str = "Something went wrong with the request. Please try again.";

impl ExchangeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Network(_) => ErrorKind::Network,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::ClientStatus { .. } => ErrorKind::ClientError,
            Self::ServerStatus { .. } => ErrorKind::ServerError,
            Self::EmptyOutput(_) => ErrorKind::EmptyOutput,
            Self::Cancelled | Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// The friendly text shown in the transcript. Only the unknown
    /// kind carries any of the raw error, and then only a bounded
    /// excerpt.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Timeout => {
                "The request took too long. Please try a shorter question.".to_string()
            }
            ErrorKind::Network => {
                "Could not reach the server. Please check your internet connection.".to_string()
            }
            ErrorKind::MalformedResponse => {
                "There was a server response error. Please try again.".to_string()
            }
            ErrorKind::ClientError => {
                "The request was rejected. Please check your question and try again.".to_string()
            }
            ErrorKind::ServerError => {
                "The service is temporarily unavailable. Please try again later.".to_string()
            }
            ErrorKind::EmptyOutput => {
                "Sorry, I couldn't get a valid answer. Please try again.".to_string()
            }
            ErrorKind::Unknown => format!(
                "{} (details: {})",
                UNKNOWN_MESSAGE,
                truncate_chars(&self.to_string(), MAX_DETAIL_CHARS)
            ),
        }
    }
}

/// Cut `text` down to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
