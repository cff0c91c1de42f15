//! HTTP request assembly for the hey load generator.
//!
//! Turns a [`DirectiveSet`] into one [`AssembledRequest`] plus its body,
//! ready for a load engine to send repeatedly.

pub mod body;
pub mod config;
pub mod error;
pub mod observability;
pub mod request;
pub mod wire;

pub use config::DirectiveSet;
pub use error::{AssembleError, AssembleResult};
pub use request::{assemble, AssembledRequest, Assembler};
