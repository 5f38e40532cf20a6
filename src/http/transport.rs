use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};

use super::{
    error::TransportError,
    models::{HttpMethod, RequestSpec, ResponseCapture},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends one request and captures the complete response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestSpec) -> Result<ResponseCapture, TransportError>;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("apiprobe/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Request {
                url: String::new(),
                message: err.to_string(),
            })?;
        Ok(Self { client, timeout })
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestSpec) -> Result<ResponseCapture, TransportError> {
        let target = request.target();
        let url = target.to_string();
        let mut builder = self.client.request(to_reqwest_method(request.method()), target);

        for (name, value) in outgoing_headers(request) {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_text());
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::from_reqwest(err, &url, self.timeout_ms()))?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(|err| TransportError::from_reqwest(err, &url, self.timeout_ms()))?;

        Ok(ResponseCapture::new(status, headers, bytes.to_vec()).with_elapsed(start.elapsed()))
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
    }
}

/// Plain headers followed by content type and authorization, which replace
/// any plain header of the same name.
fn outgoing_headers(request: &RequestSpec) -> Vec<(String, String)> {
    let content_type = request.content_type().map(str::to_string);
    let authorization = request
        .credentials()
        .map(|credentials| credentials.authorization_value());

    let mut headers: Vec<_> = request
        .headers()
        .iter()
        .filter(|(name, _)| {
            let replaced_type =
                content_type.is_some() && name.eq_ignore_ascii_case(CONTENT_TYPE.as_str());
            let replaced_auth =
                authorization.is_some() && name.eq_ignore_ascii_case(AUTHORIZATION.as_str());
            !(replaced_type || replaced_auth)
        })
        .cloned()
        .collect();
    if let Some(value) = content_type {
        headers.push((CONTENT_TYPE.as_str().to_string(), value));
    }
    if let Some(value) = authorization {
        headers.push((AUTHORIZATION.as_str().to_string(), value));
    }
    headers
}

fn collect_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}
