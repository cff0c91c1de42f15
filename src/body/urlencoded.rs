//! `application/x-www-form-urlencoded` bodies.
//!
//! Directive forms, one per item:
//! - `value`          key-less value
//! - `=value`         key-less value
//! - `name=value`
//! - `name=@file`     value is the file contents
//! - `name=pre@file`  value is `pre` followed by the file contents
//!
//! Every item is followed by `&`, including the last one. Keys are written
//! as given; only values are escaped.

use bytes::{BufMut, BytesMut};
use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::body::{EncodedBody, FileLoader};
use crate::error::{AssembleError, AssembleResult};

/// Content type of every body produced here.
pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Everything except the unreserved characters `A-Z a-z 0-9 - _ . ~`.
const QUERY_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Escape bytes for a query component: spaces become `+`, everything
/// outside the unreserved set becomes `%XX`.
pub fn query_escape(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, chunk) in input.split(|&b| b == b' ').enumerate() {
        if i > 0 {
            out.push('+');
        }
        out.extend(percent_encode(chunk, QUERY_ESCAPE_SET));
    }
    out
}

/// Encode `items` in order into a url-encoded body.
pub fn encode<L: FileLoader + ?Sized>(items: &[String], loader: &L) -> AssembleResult<EncodedBody> {
    let mut buf = BytesMut::new();

    for item in items {
        let (key, value) = match item.split_once('=') {
            Some((key, value)) => (key, value),
            None => ("", item.as_str()),
        };

        if !key.is_empty() {
            buf.put_slice(key.as_bytes());
            buf.put_u8(b'=');
        }

        match value.split_once('@') {
            Some((prefix, path)) => {
                let data = loader
                    .load(path)
                    .map_err(|e| AssembleError::file_load(path, e))?;
                buf.put_slice(query_escape(prefix.as_bytes()).as_bytes());
                buf.put_slice(query_escape(&data).as_bytes());
            }
            None => buf.put_slice(query_escape(value.as_bytes()).as_bytes()),
        }

        buf.put_u8(b'&');
    }

    tracing::debug!(items = items.len(), body_bytes = buf.len(), "url-encoded body built");
    Ok(EncodedBody::new(buf.freeze(), CONTENT_TYPE))
}
