//! HTTP/1.1 wire serialization and the trace sink.
//!
//! # Layout
//! ```text
//! METHOD /path?query HTTP/1.1\r\n
//! Host: <host>\r\n
//! Canonical-Name: value\r\n      (sorted by name)
//! \r\n
//! <body bytes>
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use http::header::HOST;

use crate::error::{AssembleError, AssembleResult};
use crate::request::AssembledRequest;

/// `content-type` → `Content-Type`.
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Write `request` followed by `body` in wire format.
pub fn write_request<W: Write>(out: &mut W, request: &AssembledRequest, body: &[u8]) -> io::Result<()> {
    write!(
        out,
        "{} {} HTTP/1.1\r\n",
        request.method(),
        request.request_target()
    )?;
    write!(out, "Host: {}\r\n", request.host())?;

    let mut headers: Vec<_> = request
        .headers()
        .iter()
        .filter(|(name, _)| **name != HOST)
        .map(|(name, value)| (canonical_name(name.as_str()), value))
        .collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, value) in headers {
        out.write_all(name.as_bytes())?;
        out.write_all(b": ")?;
        out.write_all(value.as_bytes())?;
        out.write_all(b"\r\n")?;
    }
    out.write_all(b"\r\n")?;
    out.write_all(body)
}

/// Serialize `request` and `body` into a byte vector.
pub fn to_wire(request: &AssembledRequest, body: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_request(&mut buf, request, body).expect("writing to a Vec cannot fail");
    buf
}

/// Write the wire form of the request to `path`, replacing any existing
/// file. The file is flushed and closed before any error is returned.
pub fn write_trace(path: &Path, request: &AssembledRequest, body: &[u8]) -> AssembleResult<()> {
    let trace_error = |source| AssembleError::TraceWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(trace_error)?;
    let mut out = BufWriter::new(file);
    let written = write_request(&mut out, request, body).and_then(|()| out.flush());
    drop(out);
    written.map_err(trace_error)?;

    tracing::info!(path = %path.display(), body_bytes = body.len(), "request trace written");
    Ok(())
}
