//! Directive set definitions.
//!
//! A `DirectiveSet` is everything the user asked for, before any parsing.
//! It derives Serde traits so a request profile can be kept in a TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The complete set of user inputs driving request assembly.
///
/// Empty strings count as unset, so a flag given as `-D ""` behaves like an
/// absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DirectiveSet {
    /// Method override (e.g. "PUT").
    pub method: Option<String>,

    /// Repeated `name: value` header lines, applied in order.
    pub headers: Vec<String>,

    /// Legacy single header directive. Rejected when set.
    #[serde(rename = "header")]
    pub legacy_header: Option<String>,

    /// Repeated url-encoded field lines.
    pub query: Vec<String>,

    /// Repeated multipart form field lines.
    pub form: Vec<String>,

    /// File sent verbatim as the body.
    pub body_file: Option<PathBuf>,

    /// Content type for `body_file`.
    pub content_type: Option<String>,

    /// Accept header value.
    pub accept: Option<String>,

    /// Basic auth credentials, "user:pass".
    pub auth: Option<String>,

    /// Host header override.
    pub host: Option<String>,

    /// User-Agent override.
    pub user_agent: Option<String>,

    /// Where to write the wire-format request.
    pub trace: Option<PathBuf>,
}

/// Where the request body comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySource<'a> {
    None,
    Query(&'a [String]),
    Form(&'a [String]),
    File {
        path: &'a Path,
        content_type: Option<&'a str>,
    },
}

fn set(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn set_path(value: &Option<PathBuf>) -> Option<&Path> {
    value.as_deref().filter(|p| !p.as_os_str().is_empty())
}

impl DirectiveSet {
    pub fn method(&self) -> Option<&str> {
        set(&self.method)
    }

    pub fn legacy_header(&self) -> Option<&str> {
        set(&self.legacy_header)
    }

    pub fn body_file(&self) -> Option<&Path> {
        set_path(&self.body_file)
    }

    pub fn content_type(&self) -> Option<&str> {
        set(&self.content_type)
    }

    pub fn accept(&self) -> Option<&str> {
        set(&self.accept)
    }

    pub fn auth(&self) -> Option<&str> {
        set(&self.auth)
    }

    pub fn host(&self) -> Option<&str> {
        set(&self.host)
    }

    pub fn user_agent(&self) -> Option<&str> {
        set(&self.user_agent)
    }

    pub fn trace(&self) -> Option<&Path> {
        set_path(&self.trace)
    }

    /// Number of configured body sources; more than one is a conflict.
    pub fn body_source_count(&self) -> usize {
        [
            !self.query.is_empty(),
            !self.form.is_empty(),
            self.body_file().is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// The active body source. Checks query, form, then body file; callers
    /// validate exclusivity first.
    pub fn body_source(&self) -> BodySource<'_> {
        if !self.query.is_empty() {
            BodySource::Query(&self.query)
        } else if !self.form.is_empty() {
            BodySource::Form(&self.form)
        } else if let Some(path) = self.body_file() {
            BodySource::File {
                path,
                content_type: self.content_type(),
            }
        } else {
            BodySource::None
        }
    }

    /// Overlay `other` on top of `self`.
    ///
    /// Options set in `other` win; list directives from `other` are appended
    /// after ours.
    pub fn merge(mut self, other: DirectiveSet) -> Self {
        fn pick<T>(base: Option<T>, over: Option<T>) -> Option<T> {
            over.or(base)
        }

        self.headers.extend(other.headers);
        self.query.extend(other.query);
        self.form.extend(other.form);

        DirectiveSet {
            method: pick(self.method, other.method),
            headers: self.headers,
            legacy_header: pick(self.legacy_header, other.legacy_header),
            query: self.query,
            form: self.form,
            body_file: pick(self.body_file, other.body_file),
            content_type: pick(self.content_type, other.content_type),
            accept: pick(self.accept, other.accept),
            auth: pick(self.auth, other.auth),
            host: pick(self.host, other.host),
            user_agent: pick(self.user_agent, other.user_agent),
            trace: pick(self.trace, other.trace),
        }
    }
}
