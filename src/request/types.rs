//! The assembled request handed to the load engine.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_LENGTH, HOST};
use http::{HeaderMap, Method};
use serde::Serialize;
use url::{Position, Url};

/// A fully-formed request template.
///
/// The body is not stored here; it travels alongside so the load engine can
/// attach a cheap clone of it to every send.
#[derive(Debug, Clone)]
pub struct AssembledRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    /// Host override. A `Host` entry in `headers` never reaches the wire.
    host: Option<String>,
}

impl AssembledRequest {
    pub(crate) fn new(method: Method, url: Url, headers: HeaderMap) -> Self {
        Self {
            method,
            url,
            headers,
            host: None,
        }
    }

    pub(crate) fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Effective `Host`: the override if one was applied, else the URL
    /// authority (port omitted when it is the scheme default). A custom
    /// `Host` header line is ignored here.
    pub fn host(&self) -> String {
        if let Some(host) = &self.host {
            return host.clone();
        }
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Path and query as sent on the request line.
    pub fn request_target(&self) -> &str {
        let target = &self.url[Position::BeforePath..Position::AfterQuery];
        if target.is_empty() {
            "/"
        } else {
            target
        }
    }

    /// Declared body length; absent for an empty body.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }

    /// Build one sendable copy of the request with `body` attached.
    ///
    /// The `Host` header always carries [`host`](Self::host).
    pub fn to_http_request(&self, body: &Bytes) -> Result<http::Request<Bytes>, http::Error> {
        let host = HeaderValue::from_str(&self.host())?;
        let mut request = http::Request::builder()
            .method(self.method.clone())
            .uri(self.url.as_str())
            .body(body.clone())?;
        *request.headers_mut() = self.headers.clone();
        request.headers_mut().insert(HOST, host);
        Ok(request)
    }

    /// Printable view with sensitive header values redacted.
    pub fn summary(&self, body: &[u8]) -> RequestSummary {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| {
                let value = if value.is_sensitive() {
                    "<redacted>".to_string()
                } else {
                    String::from_utf8_lossy(value.as_bytes()).into_owned()
                };
                (name.as_str().to_string(), value)
            })
            .collect();

        RequestSummary {
            method: self.method.to_string(),
            url: self.url.to_string(),
            host: self.host(),
            headers,
            body_bytes: body.len(),
        }
    }
}

/// Serializable description of an assembled request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSummary {
    pub method: String,
    pub url: String,
    pub host: String,
    pub headers: Vec<(String, String)>,
    pub body_bytes: usize,
}
