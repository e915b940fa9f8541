use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::data::{ConfigDataResolver, FastCgiConfigData, WebServerConfigData};
use super::env::{EnvProvider, ProcessEnv};
use super::error::{ConfigError, Stage};
use super::layout::Layout;
use super::lister::{DirectoryLister, FsLister};
use super::permissions::{Grant, PermissionEnforcer};
use super::template::{Template, TemplateRenderer, TemplateSource};

/// Produces one config file and returns the path it was written to
pub trait ConfigWriter: Send + Sync {
    fn write(&self, layout: &Layout, working_dir: &Path) -> Result<PathBuf, ConfigError>;
}

/// Rendered file contents together with the record they came from
#[derive(Debug, Clone)]
pub struct Rendered<T> {
    pub data: T,
    pub contents: Vec<u8>,
}

/// Writes `nginx.conf`
pub struct NginxConfigWriter {
    env: Arc<dyn EnvProvider>,
    lister: Arc<dyn DirectoryLister>,
    templates: TemplateSource,
    permissions: PermissionEnforcer,
}

impl NginxConfigWriter {
    pub fn new(templates: TemplateSource) -> Self {
        Self {
            env: Arc::new(ProcessEnv),
            lister: Arc::new(FsLister),
            templates,
            permissions: PermissionEnforcer,
        }
    }

    pub fn with_env(mut self, env: impl EnvProvider + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    pub fn with_lister(mut self, lister: impl DirectoryLister + 'static) -> Self {
        self.lister = Arc::new(lister);
        self
    }

    pub fn render(
        &self,
        layout: &Layout,
        working_dir: &Path,
    ) -> Result<Rendered<WebServerConfigData>, ConfigError> {
        let renderer = TemplateRenderer::load(&self.templates, Template::Nginx)?;
        let data = ConfigDataResolver::new(self.env.as_ref(), self.lister.as_ref())
            .web_server(layout, working_dir)?;
        let contents = renderer.render(&data)?;

        Ok(Rendered { data, contents })
    }
}

impl ConfigWriter for NginxConfigWriter {
    fn write(&self, layout: &Layout, working_dir: &Path) -> Result<PathBuf, ConfigError> {
        let Rendered { data, contents } = self.render(layout, working_dir)?;

        let path = layout.nginx_conf_path(working_dir);
        persist(&path, &contents)?;
        info!("Wrote Nginx configuration to {}", path.display());

        self.permissions.grant(&path, Grant::GroupReadWrite)?;
        self.permissions
            .grant_all(&data.fragment_files, Grant::GroupReadWrite)?;

        Ok(path)
    }
}

/// Writes the FPM pool file that makes PHP-FPM listen on the shared socket
pub struct FpmConfigWriter {
    templates: TemplateSource,
    permissions: PermissionEnforcer,
}

impl FpmConfigWriter {
    pub fn new(templates: TemplateSource) -> Self {
        Self {
            templates,
            permissions: PermissionEnforcer,
        }
    }

    pub fn render(&self, layout: &Layout) -> Result<Rendered<FastCgiConfigData>, ConfigError> {
        let renderer = TemplateRenderer::load(&self.templates, Template::Fpm)?;
        let data = ConfigDataResolver::fast_cgi(layout)?;
        let contents = renderer.render(&data)?;

        Ok(Rendered { data, contents })
    }
}

impl ConfigWriter for FpmConfigWriter {
    fn write(&self, layout: &Layout, working_dir: &Path) -> Result<PathBuf, ConfigError> {
        let Rendered { contents, .. } = self.render(layout)?;

        let path = Layout::fpm_conf_path(working_dir);
        persist(&path, &contents)?;
        info!("Wrote Nginx-specific FPM configuration to {}", path.display());

        self.permissions.grant(&path, Grant::GroupRead)?;

        Ok(path)
    }
}

/// Paths of both generated files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generated {
    pub nginx_conf: PathBuf,
    pub fpm_conf: PathBuf,
}

/// Writes `nginx.conf` then the FPM config, stopping at the first failure.
pub fn generate_all(
    nginx: &dyn ConfigWriter,
    fpm: &dyn ConfigWriter,
    layout: &Layout,
    working_dir: &Path,
) -> Result<Generated, ConfigError> {
    info!("Setting up the Nginx configuration file");
    let nginx_conf = nginx.write(layout, working_dir)?;

    info!("Setting up the Nginx-specific FPM configuration file");
    let fpm_conf = fpm.write(layout, working_dir)?;

    Ok(Generated {
        nginx_conf,
        fpm_conf,
    })
}

// Truncates in place; a failed write leaves whatever made it to disk.
fn persist(path: &Path, contents: &[u8]) -> Result<(), ConfigError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| ConfigError::persistence(Stage::Open, path, source))?;

    file.write_all(contents)
        .and_then(|()| file.flush())
        .map_err(|source| ConfigError::persistence(Stage::Write, path, source))
}
