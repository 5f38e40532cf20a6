use serde::Serialize;
use thiserror::Error;

/// The request never produced a usable response.
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportError {
    #[error("request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },
    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },
    #[error("failed reading response body from {url}: {message}")]
    Body { url: String, message: String },
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl TransportError {
    pub(crate) fn from_reqwest(error: reqwest::Error, url: &str, timeout_ms: u64) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            return Self::Timeout { url, timeout_ms };
        }
        let message = error_chain(&error);
        if error.is_connect() {
            Self::Connect { url, message }
        } else if error.is_body() || error.is_decode() {
            Self::Body { url, message }
        } else {
            Self::Request { url, message }
        }
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
