//! Wire-format tracing subsystem.
//!
//! # Data Flow
//! ```text
//! AssembledRequest + body
//!     → writer.rs (HTTP/1.1 request line, headers, body)
//!     → trace file
//!     → parser.rs (replay, diffing between runs)
//! ```
//!
//! # Design Decisions
//! - Output is byte-exact and deterministic: headers sorted by name
//! - Exactly one `Host` line, taken from the request's effective host
//! - A failed trace write fails the whole assembly

pub mod parser;
pub mod writer;

pub use parser::{parse_request, read_trace, WireError, WireRequest};
pub use writer::{to_wire, write_request, write_trace};
