//! Re-reading traced requests.

use std::fs;
use std::path::Path;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_LENGTH};
use http::{HeaderMap, Method};
use thiserror::Error;

/// Errors from parsing a wire-format request.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request head is not terminated by an empty line")]
    UnterminatedHead,

    #[error("request head is not valid UTF-8")]
    NonUtf8Head,

    #[error("invalid request line: {0:?}")]
    RequestLine(String),

    #[error("invalid header line: {0:?}")]
    HeaderLine(String),

    #[error("body is {actual} bytes, content-length says {declared}")]
    ShortBody { declared: usize, actual: usize },
}

/// A request read back from its wire form.
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: Method,
    pub target: String,
    pub version: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Parse one HTTP/1.x request.
///
/// With a `Content-Length` the body is exactly that many bytes; without one
/// it is everything after the head.
pub fn parse_request(input: &[u8]) -> Result<WireRequest, WireError> {
    let head_end = input
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or(WireError::UnterminatedHead)?;
    let head = std::str::from_utf8(&input[..head_end]).map_err(|_| WireError::NonUtf8Head)?;
    let rest = &input[head_end + 4..];

    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split(' ');
    let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version), None) if version.starts_with("HTTP/") => {
            (method, target, version)
        }
        _ => return Err(WireError::RequestLine(request_line.to_string())),
    };
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| WireError::RequestLine(request_line.to_string()))?;

    let mut headers = HeaderMap::new();
    for line in lines {
        let bad_line = || WireError::HeaderLine(line.to_string());
        let (name, value) = line.split_once(':').ok_or_else(bad_line)?;
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| bad_line())?;
        // Only the separator whitespace goes; trailing bytes belong to the value
        let value = value.trim_start_matches(|c: char| c == ' ' || c == '\t');
        let value = HeaderValue::from_str(value).map_err(|_| bad_line())?;
        headers.append(name, value);
    }

    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    let body = match declared {
        Some(declared) if declared > rest.len() => {
            return Err(WireError::ShortBody {
                declared,
                actual: rest.len(),
            })
        }
        Some(declared) => &rest[..declared],
        None => rest,
    };

    Ok(WireRequest {
        method,
        target: target.to_string(),
        version: version.to_string(),
        headers,
        body: Bytes::copy_from_slice(body),
    })
}

/// Read and parse a trace file.
pub fn read_trace(path: &Path) -> Result<WireRequest, WireError> {
    let data = fs::read(path)?;
    parse_request(&data)
}
