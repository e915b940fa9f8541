use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filesystem step that failed while producing a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    List,
    Open,
    Write,
    Stat,
    Chmod,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Stage::Read => "read",
            Stage::List => "list",
            Stage::Open => "open",
            Stage::Write => "write",
            Stage::Stat => "stat",
            Stage::Chmod => "chmod",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse {name} template: {source}")]
    TemplateParse {
        name: String,
        #[source]
        source: handlebars::TemplateError,
    },

    #[error("failed to render {name} template: {source}")]
    TemplateRender {
        name: String,
        #[source]
        source: handlebars::RenderError,
    },

    #[error("failed to parse ${var} into boolean: invalid value {value:?}")]
    EnvParse { var: String, value: String },

    #[error("${var} is not valid UTF-8: {value:?}")]
    EnvEncoding { var: String, value: String },

    #[error("path {} is not valid UTF-8", .path.display())]
    PathEncoding { path: PathBuf },

    #[error("failed to glob {pattern}: {source}")]
    PatternMatch {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to {stage} {}: {source}", .path.display())]
    Persistence {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    pub(crate) fn persistence(stage: Stage, path: &Path, source: io::Error) -> Self {
        ConfigError::Persistence {
            stage,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Underlying I/O error kind for persistence failures
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            ConfigError::Persistence { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_message_names_variable() {
        let err = ConfigError::EnvParse {
            var: "BP_PHP_ENABLE_HTTPS_REDIRECT".to_string(),
            value: "blah".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "failed to parse $BP_PHP_ENABLE_HTTPS_REDIRECT into boolean: invalid value \"blah\""
        );
    }

    #[test]
    fn test_persistence_keeps_io_message() {
        let err = ConfigError::persistence(
            Stage::Open,
            Path::new("/layers/nginx.conf"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );

        let message = err.to_string().to_lowercase();
        assert!(message.starts_with("failed to open /layers/nginx.conf: "));
        assert!(message.contains("permission denied"));
        assert_eq!(err.io_kind(), Some(io::ErrorKind::PermissionDenied));
    }
}
