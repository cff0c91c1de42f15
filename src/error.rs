//! Error types for request assembly.
//!
//! Every variant is terminal: assembly stops at the first error and no
//! partial request is returned.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::request::fields::Grammar;

/// Errors that can occur while assembling a request.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// More than one body source was configured.
    #[error("conflicting body directives: only one of form fields (-F), query fields (-d) or body file (-D) may be given")]
    Conflict,

    /// A directive line did not match its grammar.
    #[error("could not parse the provided {grammar} input; input = {input}")]
    Malformed { grammar: Grammar, input: String },

    /// A referenced file could not be read.
    #[error("load file {} error: {source}", path.display())]
    FileLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A multipart part could not be built.
    #[error("create form field {field} error: {reason}")]
    Encoding { field: String, reason: String },

    /// The trace file could not be created or written.
    #[error("write trace {} error: {source}", path.display())]
    TraceWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The method override is not a valid HTTP method token.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// The target URL could not be parsed.
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A header name or value is not allowed by HTTP.
    #[error("invalid header {name}: {value}")]
    InvalidHeader { name: String, value: String },

    /// The legacy single-header directive was used.
    #[error("flag '-h' is deprecated, please use '-H' instead")]
    DeprecatedFlag,
}

impl AssembleError {
    pub(crate) fn file_load(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileLoad {
            path: path.into(),
            source,
        }
    }
}

/// Result type for request assembly.
pub type AssembleResult<T> = Result<T, AssembleError>;
