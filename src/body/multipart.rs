//! `multipart/form-data` bodies with a fixed boundary.
//!
//! # Framing
//! ```text
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="a"\r\n
//! \r\n
//! 123
//! \r\n--<boundary>\r\n
//! Content-Disposition: form-data; name="b"; filename="a.txt"\r\n
//! Content-Type: application/octet-stream\r\n
//! \r\n
//! <file bytes>
//! \r\n--<boundary>--\r\n
//! ```
//!
//! The boundary never changes between runs, so identical directives always
//! produce identical bytes and traces can be diffed.

use bytes::{BufMut, Bytes, BytesMut};

use crate::body::{EncodedBody, FileLoader};
use crate::error::{AssembleError, AssembleResult};
use crate::request::fields::parse_form_field;

/// Boundary shared by every multipart body.
pub const BOUNDARY: &str = "--179CB67133D24A71A3DA3CC21F6F375F--";

const FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type announcing `boundary`.
pub fn content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={boundary}")
}

/// Incremental writer for a multipart body.
#[derive(Debug)]
pub struct MultipartWriter {
    buf: BytesMut,
    boundary: String,
    parts: usize,
}

impl MultipartWriter {
    pub fn new(boundary: impl Into<String>) -> Self {
        Self {
            buf: BytesMut::new(),
            boundary: boundary.into(),
            parts: 0,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Write a plain `name=value` part.
    pub fn write_field(&mut self, name: &str, value: &str) -> AssembleResult<()> {
        let disposition = format!("form-data; name=\"{}\"", escape_quotes(name));
        self.begin_part(name, &[("Content-Disposition", disposition.as_str())])?;
        self.buf.put_slice(value.as_bytes());
        Ok(())
    }

    /// Write a file part. `filename` is announced as given.
    pub fn write_file(&mut self, name: &str, filename: &str, data: &[u8]) -> AssembleResult<()> {
        let disposition = format!(
            "form-data; name=\"{}\"; filename=\"{}\"",
            escape_quotes(name),
            escape_quotes(filename)
        );
        self.begin_part(
            name,
            &[
                ("Content-Disposition", disposition.as_str()),
                ("Content-Type", FILE_CONTENT_TYPE),
            ],
        )?;
        self.buf.put_slice(data);
        Ok(())
    }

    /// Emit the closing delimiter and hand back the body.
    pub fn finish(mut self) -> Bytes {
        if self.parts > 0 {
            self.buf.put_slice(b"\r\n");
        }
        self.buf.put_slice(b"--");
        self.buf.put_slice(self.boundary.as_bytes());
        self.buf.put_slice(b"--\r\n");
        self.buf.freeze()
    }

    fn begin_part(&mut self, field: &str, headers: &[(&str, &str)]) -> AssembleResult<()> {
        // A bare CR or LF would end the part header early
        if let Some((_, value)) = headers
            .iter()
            .find(|(_, value)| value.contains(['\r', '\n']))
        {
            return Err(AssembleError::Encoding {
                field: field.to_string(),
                reason: format!("line break in part header {value:?}"),
            });
        }

        if self.parts > 0 {
            self.buf.put_slice(b"\r\n");
        }
        self.buf.put_slice(b"--");
        self.buf.put_slice(self.boundary.as_bytes());
        self.buf.put_slice(b"\r\n");
        for (name, value) in headers {
            self.buf.put_slice(name.as_bytes());
            self.buf.put_slice(b": ");
            self.buf.put_slice(value.as_bytes());
            self.buf.put_slice(b"\r\n");
        }
        self.buf.put_slice(b"\r\n");
        self.parts += 1;
        Ok(())
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Encode form directives in order into a multipart body.
pub fn encode<L: FileLoader + ?Sized>(items: &[String], loader: &L) -> AssembleResult<EncodedBody> {
    encode_with_boundary(items, loader, BOUNDARY)
}

/// Same as [`encode`] with an explicit boundary.
pub fn encode_with_boundary<L: FileLoader + ?Sized>(
    items: &[String],
    loader: &L,
    boundary: &str,
) -> AssembleResult<EncodedBody> {
    let mut writer = MultipartWriter::new(boundary);

    for item in items {
        let form = parse_form_field(item)?;
        let name = form.field.name.as_str();
        if let Some(annotation) = form.annotation {
            tracing::debug!(field = name, annotation, "part content-type annotation ignored");
        }

        match form.field.value.strip_prefix('@') {
            Some(path) => {
                let data = loader
                    .load(path)
                    .map_err(|e| AssembleError::file_load(path, e))?;
                writer.write_file(name, path, &data)?;
            }
            None => writer.write_field(name, &form.field.value)?,
        }
    }

    let content_type = content_type(writer.boundary());
    let bytes = writer.finish();
    tracing::debug!(items = items.len(), body_bytes = bytes.len(), "multipart body built");
    Ok(EncodedBody::new(bytes, content_type))
}
