use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::env::{
    parse_bool, utf8_var, EnvProvider, DEFAULT_WEB_DIR, HTTPS_REDIRECT_ENV, WEB_DIR_ENV,
};
use super::error::ConfigError;
use super::layout::Layout;
use super::lister::{DirectoryLister, FragmentPattern};
use super::template::Downstream;

/// Directory, relative to the application, holding user nginx fragments
pub const USER_CONF_DIR: &str = ".nginx.conf.d";
pub const SERVER_CONF_GLOB: &str = "*-server.conf";
pub const HTTP_CONF_GLOB: &str = "*-http.conf";
/// Variable nginx reads its listen port from at startup
pub const PORT_ENV: &str = "PORT";

/// Values rendered into `nginx.conf`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebServerConfigData {
    pub app_root: String,
    pub web_directory: String,
    pub disable_https_redirect: bool,
    /// Glob of user `server` fragments, set only when one exists
    pub user_server_conf: Option<String>,
    /// Glob of user `http` fragments, set only when one exists
    pub user_http_conf: Option<String>,
    pub fpm_socket: String,
    pub port: Downstream,
    /// Fragment files behind the two globs, for permission fixes
    #[serde(skip)]
    pub fragment_files: Vec<PathBuf>,
}

/// Values rendered into `nginx-fpm.conf`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FastCgiConfigData {
    pub fpm_socket: String,
}

/// Gathers the parameters for one template from the environment and the
/// application directory.
pub struct ConfigDataResolver<'a> {
    env: &'a dyn EnvProvider,
    lister: &'a dyn DirectoryLister,
}

impl<'a> ConfigDataResolver<'a> {
    pub fn new(env: &'a dyn EnvProvider, lister: &'a dyn DirectoryLister) -> Self {
        Self { env, lister }
    }

    pub fn web_server(
        &self,
        layout: &Layout,
        working_dir: &Path,
    ) -> Result<WebServerConfigData, ConfigError> {
        let mut fragment_files = Vec::new();

        let user_server_conf = self.user_fragment(working_dir, SERVER_CONF_GLOB, &mut fragment_files)?;
        if let Some(pattern) = &user_server_conf {
            debug!("Including user-provided Nginx server configuration from: {}", pattern);
        }

        let user_http_conf = self.user_fragment(working_dir, HTTP_CONF_GLOB, &mut fragment_files)?;
        if let Some(pattern) = &user_http_conf {
            debug!("Including user-provided Nginx HTTP configuration from: {}", pattern);
        }

        let web_directory = self.web_directory()?;
        debug!("Web directory: {}", web_directory);

        let enable_https_redirect = self.https_redirect_enabled()?;
        debug!("Enable HTTPS redirect: {}", enable_https_redirect);

        let fpm_socket = path_string(&layout.fpm_socket())?;
        debug!("FPM socket: {}", fpm_socket);

        Ok(WebServerConfigData {
            app_root: path_string(working_dir)?,
            web_directory,
            disable_https_redirect: !enable_https_redirect,
            user_server_conf,
            user_http_conf,
            fpm_socket,
            port: Downstream::env(PORT_ENV),
            fragment_files,
        })
    }

    /// The FPM record needs nothing beyond the shared socket convention
    pub fn fast_cgi(layout: &Layout) -> Result<FastCgiConfigData, ConfigError> {
        let fpm_socket = path_string(&layout.fpm_socket())?;
        debug!("FPM socket: {}", fpm_socket);

        Ok(FastCgiConfigData { fpm_socket })
    }

    pub fn web_directory(&self) -> Result<String, ConfigError> {
        Ok(utf8_var(self.env, WEB_DIR_ENV)?
            .filter(|dir| !dir.is_empty())
            .unwrap_or_else(|| DEFAULT_WEB_DIR.to_string()))
    }

    /// Redirect is on unless the variable says otherwise
    pub fn https_redirect_enabled(&self) -> Result<bool, ConfigError> {
        match utf8_var(self.env, HTTPS_REDIRECT_ENV)? {
            None => Ok(true),
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::EnvParse {
                var: HTTPS_REDIRECT_ENV.to_string(),
                value: raw,
            }),
        }
    }

    fn user_fragment(
        &self,
        working_dir: &Path,
        glob: &str,
        fragment_files: &mut Vec<PathBuf>,
    ) -> Result<Option<String>, ConfigError> {
        let pattern = FragmentPattern::new(working_dir.join(USER_CONF_DIR), glob)?;
        let matched = pattern.matches(self.lister)?;

        if matched.is_empty() {
            return Ok(None);
        }

        fragment_files.extend(matched);
        Ok(Some(pattern.pattern()))
    }
}

/// Paths end up inside nginx directives, which must be valid UTF-8 text
fn path_string(path: &Path) -> Result<String, ConfigError> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::PathEncoding {
            path: path.to_path_buf(),
        })
}
