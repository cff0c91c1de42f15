//! Request assembly.
//!
//! # Responsibilities
//! - Pick the body source and run its encoder
//! - Choose the method
//! - Build headers in a fixed order, last write wins
//! - Apply basic auth, host override and content length
//!
//! A `Host` header line stays in the map but never reaches the wire; the
//! effective host is the override or the URL authority.
//! - Write the optional wire trace
//!
//! # Header Order
//! ```text
//! Content-Type (from the body)
//!   → custom header lines, in order
//!   → Accept
//!   → User-Agent (default, or custom + default, or explicit override)
//!   → Authorization (basic auth)
//!   → Content-Length (non-empty body)
//! ```

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HOST, USER_AGENT};
use http::{HeaderMap, Method};
use url::Url;

use crate::body::{multipart, urlencoded, EncodedBody, FileLoader, FsLoader};
use crate::config::{validate_directives, BodySource, DirectiveSet};
use crate::error::{AssembleError, AssembleResult};
use crate::request::fields::{parse_auth, parse_header};
use crate::request::types::AssembledRequest;
use crate::wire;

/// User-Agent sent when nothing else is configured, and appended to a
/// custom `User-Agent` header line.
pub const DEFAULT_USER_AGENT: &str = "hey/0.0.1";

/// Builds one request from a directive set.
///
/// Stateless apart from the file loader; every call reads its files again.
#[derive(Debug, Clone, Default)]
pub struct Assembler<L = FsLoader> {
    loader: L,
}

impl Assembler<FsLoader> {
    pub fn new() -> Self {
        Self { loader: FsLoader }
    }
}

impl<L: FileLoader> Assembler<L> {
    /// Use `loader` for `@file` references and the body file.
    pub fn with_loader(loader: L) -> Self {
        Self { loader }
    }

    /// Assemble the request for `url`.
    ///
    /// Returns the request template and its body, or the first error hit.
    pub fn assemble(&self, url: &str, directives: &DirectiveSet) -> AssembleResult<(AssembledRequest, Bytes)> {
        validate_directives(directives)?;

        let body = self.encode_body(directives)?;
        let method = choose_method(directives.method(), &body)?;

        let mut headers = HeaderMap::new();
        if !body.content_type.is_empty() {
            set_header(&mut headers, CONTENT_TYPE, &body.content_type)?;
        }
        for line in &directives.headers {
            let field = parse_header(line)?;
            let name = HeaderName::from_bytes(field.name.as_bytes()).map_err(|_| AssembleError::InvalidHeader {
                name: field.name.clone(),
                value: field.value.clone(),
            })?;
            set_header(&mut headers, name, &field.value)?;
        }
        if let Some(accept) = directives.accept() {
            set_header(&mut headers, ACCEPT, accept)?;
        }

        let user_agent = match headers.get(USER_AGENT) {
            Some(custom) => format!("{} {DEFAULT_USER_AGENT}", String::from_utf8_lossy(custom.as_bytes())),
            None => DEFAULT_USER_AGENT.to_string(),
        };
        set_header(&mut headers, USER_AGENT, &user_agent)?;
        if let Some(user_agent) = directives.user_agent() {
            set_header(&mut headers, USER_AGENT, user_agent)?;
        }

        let target = Url::parse(url).map_err(|source| AssembleError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        if let Some(auth) = directives.auth() {
            let credentials = parse_auth(auth)?;
            headers.insert(AUTHORIZATION, basic_auth(&credentials.name, &credentials.value)?);
        }
        if let Some(host) = directives.host() {
            HeaderValue::from_str(host).map_err(|_| AssembleError::InvalidHeader {
                name: HOST.to_string(),
                value: host.to_string(),
            })?;
        }
        if !body.is_empty() {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.bytes.len()));
        }

        let mut request = AssembledRequest::new(method, target, headers);
        if let Some(host) = directives.host() {
            request = request.with_host(host);
        }
        tracing::info!(
            method = %request.method(),
            url = %request.url(),
            body_bytes = body.bytes.len(),
            content_type = %body.content_type,
            "request assembled"
        );

        if let Some(path) = directives.trace() {
            wire::write_trace(path, &request, &body.bytes)?;
        }

        Ok((request, body.bytes))
    }

    fn encode_body(&self, directives: &DirectiveSet) -> AssembleResult<EncodedBody> {
        match directives.body_source() {
            BodySource::Query(items) => urlencoded::encode(items, &self.loader),
            BodySource::Form(items) => multipart::encode(items, &self.loader),
            BodySource::File { path, content_type } => {
                let shown = path.to_string_lossy();
                let data = self
                    .loader
                    .load(&shown)
                    .map_err(|e| AssembleError::file_load(path, e))?;
                tracing::debug!(path = %shown, body_bytes = data.len(), "body file loaded");
                Ok(EncodedBody::new(data, content_type.unwrap_or_default()))
            }
            BodySource::None => Ok(EncodedBody::default()),
        }
    }
}

/// Assemble with the filesystem loader.
pub fn assemble(url: &str, directives: &DirectiveSet) -> AssembleResult<(AssembledRequest, Bytes)> {
    Assembler::new().assemble(url, directives)
}

fn choose_method(requested: Option<&str>, body: &EncodedBody) -> AssembleResult<Method> {
    match requested {
        Some(method) => {
            Method::from_bytes(method.as_bytes()).map_err(|_| AssembleError::InvalidMethod(method.to_string()))
        }
        None if body.is_empty() => Ok(Method::GET),
        None => Ok(Method::POST),
    }
}

fn set_header(headers: &mut HeaderMap, name: HeaderName, value: &str) -> AssembleResult<()> {
    let value = HeaderValue::from_str(value).map_err(|_| AssembleError::InvalidHeader {
        name: name.to_string(),
        value: value.to_string(),
    })?;
    headers.insert(name, value);
    Ok(())
}

fn basic_auth(username: &str, password: &str) -> AssembleResult<HeaderValue> {
    let encoded = BASE64_STANDARD.encode(format!("{username}:{password}"));
    let mut value =
        HeaderValue::from_str(&format!("Basic {encoded}")).map_err(|_| AssembleError::InvalidHeader {
            name: AUTHORIZATION.to_string(),
            value: "<redacted>".to_string(),
        })?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn stub_loader(path: &str) -> io::Result<Vec<u8>> {
        Ok(format!("{{{path}}}").into_bytes())
    }

    fn assembler() -> Assembler<fn(&str) -> io::Result<Vec<u8>>> {
        Assembler::with_loader(stub_loader as fn(&str) -> io::Result<Vec<u8>>)
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_get() {
        let (req, body) = assembler()
            .assemble("http://example.com/", &DirectiveSet::default())
            .unwrap();
        assert_eq!(req.method(), Method::GET);
        assert!(body.is_empty());
        assert_eq!(req.headers()[USER_AGENT], DEFAULT_USER_AGENT);
        assert!(req.headers().get(CONTENT_TYPE).is_none());
        assert_eq!(req.content_length(), None);
    }

    #[test]
    fn test_body_implies_post() {
        let directives = DirectiveSet {
            query: strings(&["a=1"]),
            ..Default::default()
        };
        let (req, body) = assembler().assemble("http://example.com/", &directives).unwrap();
        assert_eq!(req.method(), Method::POST);
        assert_eq!(&body[..], b"a=1&");
        assert_eq!(req.headers()[CONTENT_TYPE], urlencoded::CONTENT_TYPE);
        assert_eq!(req.content_length(), Some(4));
    }

    #[test]
    fn test_method_override() {
        let directives = DirectiveSet {
            method: Some("DELETE".into()),
            query: strings(&["id=7"]),
            ..Default::default()
        };
        let (req, _) = assembler().assemble("http://example.com/", &directives).unwrap();
        assert_eq!(req.method(), Method::DELETE);
    }

    #[test]
    fn test_invalid_method() {
        let directives = DirectiveSet {
            method: Some("GE T".into()),
            ..Default::default()
        };
        let err = assembler().assemble("http://example.com/", &directives).unwrap_err();
        assert!(matches!(err, AssembleError::InvalidMethod(m) if m == "GE T"));
    }

    #[test]
    fn test_header_last_write_wins() {
        let directives = DirectiveSet {
            headers: strings(&["X-Env: staging", "x-env: production"]),
            ..Default::default()
        };
        let (req, _) = assembler().assemble("http://example.com/", &directives).unwrap();
        let values: Vec<_> = req.headers().get_all("x-env").iter().collect();
        assert_eq!(values, vec!["production"]);
    }

    #[test]
    fn test_custom_header_overrides_body_content_type() {
        let directives = DirectiveSet {
            form: strings(&["a=1"]),
            headers: strings(&["Content-Type: text/plain"]),
            ..Default::default()
        };
        let (req, _) = assembler().assemble("http://example.com/", &directives).unwrap();
        assert_eq!(req.headers()[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_accept_overrides_header_line() {
        let directives = DirectiveSet {
            headers: strings(&["Accept: text/html"]),
            accept: Some("application/json".into()),
            ..Default::default()
        };
        let (req, _) = assembler().assemble("http://example.com/", &directives).unwrap();
        assert_eq!(req.headers()[ACCEPT], "application/json");
    }

    #[test]
    fn test_user_agent_composition() {
        let directives = DirectiveSet {
            headers: strings(&["User-Agent: crawler/2"]),
            ..Default::default()
        };
        let (req, _) = assembler().assemble("http://example.com/", &directives).unwrap();
        assert_eq!(req.headers()[USER_AGENT], format!("crawler/2 {DEFAULT_USER_AGENT}").as_str());

        let directives = DirectiveSet {
            headers: strings(&["User-Agent: crawler/2"]),
            user_agent: Some("custom/1".into()),
            ..Default::default()
        };
        let (req, _) = assembler().assemble("http://example.com/", &directives).unwrap();
        assert_eq!(req.headers()[USER_AGENT], "custom/1");
    }

    #[test]
    fn test_basic_auth() {
        let directives = DirectiveSet {
            auth: Some("alice:secret".into()),
            ..Default::default()
        };
        let (req, _) = assembler().assemble("http://example.com/", &directives).unwrap();
        let value = &req.headers()[AUTHORIZATION];
        assert_eq!(value, "Basic YWxpY2U6c2VjcmV0");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_auth_with_leading_space_password_fails() {
        let directives = DirectiveSet {
            auth: Some("alice: secret".into()),
            ..Default::default()
        };
        let err = assembler().assemble("http://example.com/", &directives).unwrap_err();
        assert!(matches!(err, AssembleError::Malformed { .. }));
    }

    #[test]
    fn test_host_override() {
        let directives = DirectiveSet {
            host: Some("api.internal".into()),
            ..Default::default()
        };
        let (req, _) = assembler().assemble("http://10.1.2.3:8080/", &directives).unwrap();
        assert_eq!(req.host(), "api.internal");
        assert_eq!(req.url().as_str(), "http://10.1.2.3:8080/");
    }

    #[test]
    fn test_host_header_line_without_override_is_ignored() {
        let directives = DirectiveSet {
            headers: strings(&["Host: spoofed.example"]),
            ..Default::default()
        };
        let (req, _) = assembler().assemble("http://10.1.2.3:8080/", &directives).unwrap();
        assert_eq!(req.host(), "10.1.2.3:8080");
    }

    #[test]
    fn test_host_override_beats_header_line() {
        let directives = DirectiveSet {
            headers: strings(&["Host: spoofed.example"]),
            host: Some("api.internal".into()),
            ..Default::default()
        };
        let (req, _) = assembler().assemble("http://10.1.2.3:8080/", &directives).unwrap();
        assert_eq!(req.host(), "api.internal");
    }

    #[test]
    fn test_invalid_host_override() {
        let directives = DirectiveSet {
            host: Some("bad\nhost".into()),
            ..Default::default()
        };
        let err = assembler().assemble("http://example.com/", &directives).unwrap_err();
        assert!(matches!(err, AssembleError::InvalidHeader { name, .. } if name == "host"));
    }

    #[test]
    fn test_default_user_agent_literal() {
        assert_eq!(DEFAULT_USER_AGENT, "hey/0.0.1");
    }

    #[test]
    fn test_body_file_with_content_type() {
        let directives = DirectiveSet {
            body_file: Some("payload.json".into()),
            content_type: Some("application/json".into()),
            ..Default::default()
        };
        let (req, body) = assembler().assemble("http://example.com/", &directives).unwrap();
        assert_eq!(&body[..], b"{payload.json}");
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(req.content_length(), Some(body.len() as u64));
    }

    #[test]
    fn test_body_file_without_content_type() {
        let directives = DirectiveSet {
            body_file: Some("payload.bin".into()),
            ..Default::default()
        };
        let (req, _) = assembler().assemble("http://example.com/", &directives).unwrap();
        assert!(req.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_conflict_before_encoding() {
        let failing = |_: &str| -> io::Result<Vec<u8>> { panic!("no file should be read") };
        let directives = DirectiveSet {
            query: strings(&["a=@x"]),
            form: strings(&["b=@y"]),
            ..Default::default()
        };
        let err = Assembler::with_loader(failing)
            .assemble("http://example.com/", &directives)
            .unwrap_err();
        assert!(matches!(err, AssembleError::Conflict));
    }

    #[test]
    fn test_malformed_header_line() {
        let directives = DirectiveSet {
            headers: strings(&["not a header"]),
            ..Default::default()
        };
        let err = assembler().assemble("http://example.com/", &directives).unwrap_err();
        match err {
            AssembleError::Malformed { input, .. } => assert_eq!(input, "not a header"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_url() {
        let err = assembler().assemble("not a url", &DirectiveSet::default()).unwrap_err();
        assert!(matches!(err, AssembleError::InvalidUrl { .. }));
    }
}
