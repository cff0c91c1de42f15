//! Request body encoding subsystem.
//!
//! # Data Flow
//! ```text
//! query directives (-d)           form directives (-F)
//!     → urlencoded.rs                 → multipart.rs
//!         ↘ FileLoader (@path)  ↙
//!     → EncodedBody { bytes, content_type }
//!     → request assembler
//! ```
//!
//! # Design Decisions
//! - Encoders are pure over their inputs plus a `FileLoader`, so tests can
//!   substitute file contents without touching disk
//! - Files are read on every reference; nothing is cached
//! - Output is deterministic: no random boundaries, input order preserved

pub mod multipart;
pub mod urlencoded;

use std::fs;
use std::io;

use bytes::Bytes;

/// Source of file contents for `@path` indirection.
pub trait FileLoader {
    /// Read the full contents of `path`.
    fn load(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Reads files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl FileLoader for FsLoader {
    fn load(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

impl<F> FileLoader for F
where
    F: Fn(&str) -> io::Result<Vec<u8>>,
{
    fn load(&self, path: &str) -> io::Result<Vec<u8>> {
        self(path)
    }
}

/// A serialized body and the content type that must accompany it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedBody {
    pub bytes: Bytes,
    /// Empty when no content type applies.
    pub content_type: String,
}

impl EncodedBody {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
