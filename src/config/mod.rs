pub mod defaults;
pub mod parser;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use anyhow::Result;

use crate::nginx::{Layout, TemplateSource};
use defaults::*;

/// Tool settings, read from an optional TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
    /// Dedicated layer for nginx.conf and the FPM socket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_path: Option<PathBuf>,
    /// Directory with nginx.conf and nginx-fpm.conf templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            layer_path: None,
            templates_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GeneratorConfig {
    pub fn layout(&self) -> Layout {
        Layout::from_layer_path(self.layer_path.clone())
    }

    pub fn template_source(&self) -> TemplateSource {
        match &self.templates_dir {
            Some(dir) => TemplateSource::Directory(dir.clone()),
            None => TemplateSource::Embedded,
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        parser::parse_settings(path)
    }

    pub fn validate(&self) -> Result<Vec<String>> {
        validator::validate_settings(self)
    }
}
