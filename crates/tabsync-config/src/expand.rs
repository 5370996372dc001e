//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}`, `${VAR:-default}` and a leading `~` in `value`.
///
/// `field` names the configuration key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
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
    fn test_literal_unchanged() {
        assert_eq!(expand_env("prefs", "store.dir").unwrap(), "prefs");
    }

    #[test]
    fn test_default_value_used_when_unset() {
        assert_eq!(
            expand_env("${TABSYNC_EXPAND_UNSET_TEST:-fallback}/prefs", "store.dir").unwrap(),
            "fallback/prefs"
        );
    }

    #[test]
    fn test_missing_variable_names_field() {
        let err = expand_env("${TABSYNC_EXPAND_MISSING_TEST}", "store.dir").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("TABSYNC_EXPAND_MISSING_TEST"));
        assert!(msg.contains("store.dir"));
    }
}
