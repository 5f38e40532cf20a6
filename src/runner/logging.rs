use log::{info, log_enabled, Level};
use serde::{Deserialize, Serialize};

use crate::http::{RequestSpec, ResponseCapture};

const TARGET: &str = "apiprobe::http";

/// How much of each exchange is written to the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogDetail {
    Off,
    /// Request URI and body, response status and body.
    #[default]
    Summary,
    /// Summary plus request and response headers.
    All,
}

pub(crate) fn log_request(test: &str, request: &RequestSpec, detail: LogDetail, limit: usize) {
    if detail == LogDetail::Off || !log_enabled!(target: TARGET, Level::Info) {
        return;
    }

    info!(target: TARGET, "[{test}] --> {} {}", request.method(), request.target());
    if detail == LogDetail::All {
        if let Some(content_type) = request.content_type() {
            info!(target: TARGET, "[{test}]     content-type: {content_type}");
        }
        for (name, value) in request.headers() {
            info!(target: TARGET, "[{test}]     {name}: {}", redact(name, value));
        }
        if let Some(credentials) = request.credentials() {
            info!(
                target: TARGET,
                "[{test}]     authorization: Basic {}:***", credentials.username
            );
        }
    }
    let body = request
        .body()
        .map(|body| preview_body(body.to_text().as_bytes(), limit))
        .unwrap_or_default();
    info!(target: TARGET, "[{test}]     body: {}", or_empty(&body));
}

pub(crate) fn log_response(test: &str, capture: &ResponseCapture, detail: LogDetail, limit: usize) {
    if detail == LogDetail::Off || !log_enabled!(target: TARGET, Level::Info) {
        return;
    }

    info!(
        target: TARGET,
        "[{test}] <-- {} ({:.1} ms)",
        capture.status(),
        capture.elapsed().as_secs_f64() * 1000.0
    );
    if detail == LogDetail::All {
        for (name, value) in capture.headers() {
            info!(target: TARGET, "[{test}]     {name}: {}", redact(name, value));
        }
    }
    let body = preview_body(capture.body(), limit);
    info!(target: TARGET, "[{test}]     body: {}", or_empty(&body));
}

/// Text preview of a body, hex-encoded when it is not UTF-8.
pub fn preview_body(bytes: &[u8], limit: usize) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) if text.len() <= limit => text.to_string(),
        Ok(text) => {
            let mut end = limit;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... ({} bytes)", &text[..end], bytes.len())
        }
        Err(_) if bytes.len() <= limit => hex::encode(bytes),
        Err(_) => format!("{}... ({} bytes)", hex::encode(&bytes[..limit]), bytes.len()),
    }
}

fn redact<'a>(name: &str, value: &'a str) -> &'a str {
    if name.eq_ignore_ascii_case("authorization") || name.eq_ignore_ascii_case("x-api-key") {
        "***"
    } else {
        value
    }
}

fn or_empty(body: &str) -> &str {
    if body.is_empty() {
        "<empty>"
    } else {
        body
    }
}
