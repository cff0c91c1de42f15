//! Directive line grammars.
//!
//! Three independent grammars turn free-text directive lines into
//! name/value pairs:
//!
//! | grammar      | shape               | example                  |
//! |--------------|---------------------|--------------------------|
//! | `header`     | `name: value`       | `Accept: text/html`      |
//! | `auth`       | `user:pass`         | `alice:secret`           |
//! | `form-field` | `name=value[;type]` | `c=@img.png;image/png`   |
//!
//! Names are ASCII word characters and hyphens. Whitespace classes are the
//! ASCII set `[\t\n\f\r ]`. A line that does not match is rejected outright.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AssembleError, AssembleResult};

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_-]+):[\t\n\x0C\r ]*(.+)").expect("header pattern"));

static AUTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:\n]+):([^\t\n\x0C\r ].*)").expect("auth pattern"));

static FORM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_-]+)=(.+)").expect("form pattern"));

/// Which grammar a directive line is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Header,
    Auth,
    FormField,
}

impl Grammar {
    fn pattern(self) -> &'static Regex {
        match self {
            Grammar::Header => &HEADER_RE,
            Grammar::Auth => &AUTH_RE,
            Grammar::FormField => &FORM_RE,
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grammar::Header => f.write_str("header"),
            Grammar::Auth => f.write_str("auth"),
            Grammar::FormField => f.write_str("form-field"),
        }
    }
}

/// A directive line split into its two halves.
///
/// For the auth grammar `name` is the username and `value` the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedField {
    pub name: String,
    pub value: String,
}

/// A form directive after the annotation has been split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField<'a> {
    pub field: ParsedField,
    /// Text after the first `;`, reserved for a per-part content type.
    /// Not applied to the encoded body yet.
    pub annotation: Option<&'a str>,
}

/// Match `input` against `grammar`.
///
/// The form-field grammar only sees the text before the first `;`.
pub fn parse_field(input: &str, grammar: Grammar) -> AssembleResult<ParsedField> {
    let subject = match grammar {
        Grammar::FormField => split_annotation(input).0,
        Grammar::Header | Grammar::Auth => input,
    };

    let caps = grammar
        .pattern()
        .captures(subject)
        .ok_or_else(|| AssembleError::Malformed {
            grammar,
            input: input.to_string(),
        })?;

    Ok(ParsedField {
        name: caps[1].to_string(),
        value: caps[2].to_string(),
    })
}

/// Parse a `name: value` header line.
pub fn parse_header(input: &str) -> AssembleResult<ParsedField> {
    parse_field(input, Grammar::Header)
}

/// Parse a `user:pass` credential string.
pub fn parse_auth(input: &str) -> AssembleResult<ParsedField> {
    parse_field(input, Grammar::Auth)
}

/// Parse a `name=value[;annotation]` form directive.
pub fn parse_form_field(input: &str) -> AssembleResult<FormField<'_>> {
    let field = parse_field(input, Grammar::FormField)?;
    Ok(FormField {
        field,
        annotation: split_annotation(input).1,
    })
}

fn split_annotation(input: &str) -> (&str, Option<&str>) {
    match input.split_once(';') {
        Some((head, tail)) => (head, Some(tail)),
        None => (input, None),
    }
}
