use handlebars::Handlebars;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use super::error::{ConfigError, Stage};
use super::layout::{FPM_CONF, NGINX_CONF};

const EMBEDDED_NGINX: &str = include_str!("../../config/nginx.conf");
const EMBEDDED_FPM: &str = include_str!("../../config/nginx-fpm.conf");

/// Text handed to a later templating pass untouched.
///
/// nginx expands `{{env "PORT"}}` itself when it starts, so the value is
/// carried as data and written out verbatim instead of being part of the
/// template source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Downstream(String);

impl Downstream {
    /// Environment lookup resolved by the web server at startup
    pub fn env(var: &str) -> Self {
        Self(format!("{{{{env \"{var}\"}}}}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Downstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Nginx,
    Fpm,
}

impl Template {
    pub fn file_name(self) -> &'static str {
        match self {
            Template::Nginx => NGINX_CONF,
            Template::Fpm => FPM_CONF,
        }
    }

    fn embedded(self) -> &'static str {
        match self {
            Template::Nginx => EMBEDDED_NGINX,
            Template::Fpm => EMBEDDED_FPM,
        }
    }
}

/// Where template text comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    #[default]
    Embedded,
    /// A directory holding `nginx.conf` and `nginx-fpm.conf`.
    ///
    /// Downstream syntax written directly in such a template must be
    /// escaped as `\{{env "PORT"}}`, which renders as `{{env "PORT"}}`.
    Directory(PathBuf),
}

impl TemplateSource {
    pub fn load(&self, template: Template) -> Result<Cow<'static, str>, ConfigError> {
        match self {
            TemplateSource::Embedded => Ok(Cow::Borrowed(template.embedded())),
            TemplateSource::Directory(dir) => {
                let path = dir.join(template.file_name());
                fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|source| ConfigError::persistence(Stage::Read, &path, source))
            }
        }
    }
}

/// A parsed template, ready to render against a data record.
///
/// Rendering is strict: a reference to a field the record does not have
/// fails instead of producing an empty string. Output is never escaped.
pub struct TemplateRenderer {
    name: String,
    registry: Handlebars<'static>,
}

impl TemplateRenderer {
    pub fn parse(name: &str, source: &str) -> Result<Self, ConfigError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(name, source)
            .map_err(|source| ConfigError::TemplateParse {
                name: name.to_string(),
                source,
            })?;

        Ok(Self {
            name: name.to_string(),
            registry,
        })
    }

    pub fn load(source: &TemplateSource, template: Template) -> Result<Self, ConfigError> {
        let text = source.load(template)?;
        Self::parse(template.file_name(), &text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render<T: Serialize>(&self, data: &T) -> Result<Vec<u8>, ConfigError> {
        self.registry
            .render(&self.name, data)
            .map(String::into_bytes)
            .map_err(|source| ConfigError::TemplateRender {
                name: self.name.clone(),
                source,
            })
    }
}
