use std::{fmt, time::Duration};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::extract::ExtractError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Json(Value),
}

impl RequestBody {
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Json(value) => value.to_string(),
        }
    }
}

/// A fully described outgoing request.
///
/// Built once per test through the consuming `with_*` methods and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: HttpMethod,
    url: Url,
    headers: Vec<(String, String)>,
    content_type: Option<String>,
    body: Option<RequestBody>,
    credentials: Option<Credentials>,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            content_type: None,
            body: None,
            credentials: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: Url) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: Url) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Raw body sent as-is, without touching the content type.
    pub fn with_text_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    /// Structured body; also sets the JSON content type.
    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self.content_type = Some(JSON_CONTENT_TYPE.to_string());
        self
    }

    pub fn with_basic_auth(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The URL exactly as given, user-info included.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// The URL that goes on the wire: user-info removed.
    pub fn target(&self) -> Url {
        let mut target = self.url.clone();
        // Only fails for cannot-be-a-base URLs, which carry no user-info.
        let _ = target.set_username("");
        let _ = target.set_password(None);
        target
    }

    /// Explicit credentials win; otherwise the URL's user-info is used.
    pub fn credentials(&self) -> Option<Credentials> {
        if let Some(explicit) = &self.credentials {
            return Some(explicit.clone());
        }
        credentials_from_url(&self.url)
    }
}

fn credentials_from_url(url: &Url) -> Option<Credentials> {
    if url.username().is_empty() && url.password().is_none() {
        return None;
    }
    let username = percent_decode(url.username());
    let password = url.password().map(percent_decode).unwrap_or_default();
    Some(Credentials { username, password })
}

/// Decodes `%XX` escapes; a value that is not valid UTF-8 once decoded is kept as written.
fn percent_decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

/// Everything the server sent back for one request.
#[derive(Debug)]
pub struct ResponseCapture {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    elapsed: Duration,
    parsed: OnceCell<Result<Value, String>>,
}

impl ResponseCapture {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect(),
            body,
            elapsed: Duration::ZERO,
            parsed: OnceCell::new(),
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Parsed body, computed on first call and cached.
    pub fn json(&self) -> Result<&Value, ExtractError> {
        let parsed = self
            .parsed
            .get_or_init(|| serde_json::from_slice(&self.body).map_err(|err| err.to_string()));
        parsed.as_ref().map_err(|message| ExtractError::MalformedBody {
            message: message.clone(),
            preview: crate::runner::preview_body(&self.body, 120),
        })
    }
}
