//! Request profile loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::DirectiveSet;
use crate::config::validation::validate_directives;
use crate::error::AssembleError;

/// Error type for profile loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Invalid(#[source] AssembleError),
}

/// Parse and validate a TOML request profile.
pub fn parse_directives(content: &str) -> Result<DirectiveSet, ConfigError> {
    let directives: DirectiveSet = toml::from_str(content)?;
    validate_directives(&directives).map_err(ConfigError::Invalid)?;
    Ok(directives)
}

/// Load and validate a request profile from a TOML file.
pub fn load_directives(path: &Path) -> Result<DirectiveSet, ConfigError> {
    let content = fs::read_to_string(path)?;
    let directives = parse_directives(&content)?;
    tracing::debug!(path = %path.display(), "request profile loaded");
    Ok(directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile() {
        let directives = parse_directives(
            r#"
            method = "PATCH"
            headers = ["X-Api-Key: abc", "Accept-Language: en"]
            form = ["a=1", "b=@b.txt"]
            auth = "alice:secret"
            trace = "/tmp/req.trace"
            "#,
        )
        .unwrap();

        assert_eq!(directives.method(), Some("PATCH"));
        assert_eq!(directives.headers.len(), 2);
        assert_eq!(directives.form, vec!["a=1".to_string(), "b=@b.txt".to_string()]);
        assert_eq!(directives.auth(), Some("alice:secret"));
        assert_eq!(directives.trace(), Some(Path::new("/tmp/req.trace")));
        assert!(directives.query.is_empty());
    }

    #[test]
    fn test_empty_profile_is_default() {
        assert_eq!(parse_directives("").unwrap(), DirectiveSet::default());
    }

    #[test]
    fn test_legacy_header_key() {
        let err = parse_directives(r#"header = "Accept: */*""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(AssembleError::DeprecatedFlag)));
    }

    #[test]
    fn test_conflicting_profile() {
        let err = parse_directives(
            r#"
            query = ["a=1"]
            body_file = "payload.bin"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(AssembleError::Conflict)));
    }

    #[test]
    fn test_unparseable_profile() {
        assert!(matches!(
            parse_directives("headers = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_directives(Path::new("/nonexistent/profile.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
