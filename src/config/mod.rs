//! Directive configuration subsystem.
//!
//! # Data Flow
//! ```text
//! request profile (TOML)          command-line flags
//!     → loader.rs (parse)              → main.rs (clap)
//!            ↘                      ↙
//!              DirectiveSet::merge
//!     → validation.rs (body source exclusivity, retired flags)
//!     → DirectiveSet (immutable, passed to the assembler)
//! ```
//!
//! # Design Decisions
//! - Directives are a plain value handed to the assembler; no global state
//! - All fields have defaults to allow minimal profiles
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_directives, ConfigError};
pub use schema::{BodySource, DirectiveSet};
pub use validation::validate_directives;
