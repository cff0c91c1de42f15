//! Directive validation.
//!
//! # Responsibilities
//! - At most one body source (query fields, form fields, body file)
//! - Reject the retired single-header directive
//!
//! # Design Decisions
//! - Runs before any file is read or any body is encoded
//! - Pure function of the directive set; the first failure is returned

use crate::config::schema::DirectiveSet;
use crate::error::{AssembleError, AssembleResult};

/// Check the directive set before assembly starts.
pub fn validate_directives(directives: &DirectiveSet) -> AssembleResult<()> {
    if directives.body_source_count() > 1 {
        return Err(AssembleError::Conflict);
    }
    if directives.legacy_header().is_some() {
        return Err(AssembleError::DeprecatedFlag);
    }
    Ok(())
}
