//! Environment variable and home directory expansion for config values.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `${VAR}`, `${VAR:-default}` and a leading `~` in a path value.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_plain_value() {
        assert_eq!(expand_path("/Users", "sandbox.rebase_base").unwrap(), "/Users");
    }

    #[test]
    fn test_expand_path_default_value() {
        let value = expand_path("${SVGCONV_TEST_SURELY_UNSET:-/srv/out}", "field").unwrap();
        assert_eq!(value, "/srv/out");
    }

    #[test]
    fn test_expand_path_missing_var() {
        let err = expand_path("${SVGCONV_TEST_SURELY_UNSET}", "sandbox.rebase_base").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sandbox.rebase_base"), "{message}");
        assert!(message.contains("SVGCONV_TEST_SURELY_UNSET"), "{message}");
    }

    #[test]
    fn test_expand_path_keeps_relative() {
        assert_eq!(expand_path("renders", "field").unwrap(), "renders");
    }
}
