//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the configuration key for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_passes_through() {
        assert_eq!(expand_env("content/pages", "pages.dir").unwrap(), "content/pages");
    }

    #[test]
    fn test_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FOLIO_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("${FOLIO_EXPAND_UNSET:-site}/pages", "pages.dir").unwrap(),
            "site/pages"
        );
    }

    #[test]
    fn test_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FOLIO_EXPAND_MISSING");
        }
        let err = expand_env("${FOLIO_EXPAND_MISSING}", "pages.dir").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("pages.dir"), "{message}");
        assert!(message.contains("FOLIO_EXPAND_MISSING"), "{message}");
    }
}
