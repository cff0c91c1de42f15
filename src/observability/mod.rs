//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config, body encoders, assembler, wire trace
//!     → tracing events with structured fields
//!     → logging.rs subscriber (stderr, filtered by RUST_LOG)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; the binary installs the subscriber
//! - Credentials and body contents are never logged, only sizes

pub mod logging;
