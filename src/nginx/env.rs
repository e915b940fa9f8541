use std::collections::HashMap;
use std::ffi::OsString;

use super::error::ConfigError;

/// Document root subdirectory, relative to the application root
pub const WEB_DIR_ENV: &str = "BP_PHP_WEB_DIR";
/// Optional boolean toggling the plain HTTP to HTTPS redirect
pub const HTTPS_REDIRECT_ENV: &str = "BP_PHP_ENABLE_HTTPS_REDIRECT";
/// Buildpack log level, `DEBUG` turns on debug output
pub const LOG_LEVEL_ENV: &str = "BP_LOG_LEVEL";

pub const DEFAULT_WEB_DIR: &str = "htdocs";

/// Source of environment values for the resolver
pub trait EnvProvider: Send + Sync {
    /// Returns the raw value when the variable is set, even if empty
    fn var_os(&self, key: &str) -> Option<OsString>;
}

/// Looks up `key`, rejecting values that are not valid UTF-8
pub fn utf8_var(env: &dyn EnvProvider, key: &str) -> Result<Option<String>, ConfigError> {
    env.var_os(key)
        .map(|value| {
            value.into_string().map_err(|value| ConfigError::EnvEncoding {
                var: key.to_string(),
                value: value.to_string_lossy().into_owned(),
            })
        })
        .transpose()
}

/// Reads the current process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

/// Fixed set of variables, used where the process environment must not leak in
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: HashMap<String, OsString>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<OsString>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvProvider for MapEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }
}

/// Parses the boolean spellings accepted by buildpack environment flags.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_spellings() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        for raw in ["", "blah", "yes", "tRuE", " true"] {
            assert_eq!(parse_bool(raw), None, "{raw}");
        }
    }

    #[test]
    fn test_map_env_distinguishes_empty_from_unset() {
        let env: MapEnv = [(WEB_DIR_ENV, "")].into_iter().collect();

        assert_eq!(env.var_os(WEB_DIR_ENV), Some(OsString::new()));
        assert_eq!(utf8_var(&env, WEB_DIR_ENV).unwrap(), Some(String::new()));
        assert_eq!(utf8_var(&env, HTTPS_REDIRECT_ENV).unwrap(), None);
    }

    #[test]
    fn test_non_utf8_value_is_rejected() {
        use std::os::unix::ffi::OsStringExt;

        let env = MapEnv::new().with(WEB_DIR_ENV, OsString::from_vec(b"web\xffdir".to_vec()));

        let err = utf8_var(&env, WEB_DIR_ENV).unwrap_err();

        assert!(matches!(err, ConfigError::EnvEncoding { ref var, .. } if var == WEB_DIR_ENV));
        assert_eq!(
            err.to_string(),
            "$BP_PHP_WEB_DIR is not valid UTF-8: \"web\u{fffd}dir\""
        );
    }
}
