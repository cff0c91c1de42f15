//! Request assembly subsystem.
//!
//! # Data Flow
//! ```text
//! DirectiveSet
//!     → config::validation (one body source at most)
//!     → body encoder (url-encoded | multipart | body file)
//!     → fields.rs (header and auth grammars)
//!     → assembler.rs (method, headers, auth, host, content length)
//!     → AssembledRequest + body
//!     → [wire trace] (optional)
//!     → load engine (external)
//! ```
//!
//! # Design Decisions
//! - One synchronous pass, no shared state between calls
//! - Headers are a case-insensitive map; later writes replace earlier ones
//! - The body is returned beside the request, not inside it

pub mod assembler;
pub mod fields;
pub mod types;

pub use assembler::{assemble, Assembler, DEFAULT_USER_AGENT};
pub use fields::{parse_field, Grammar, ParsedField};
pub use types::{AssembledRequest, RequestSummary};
