use std::path::{Path, PathBuf};

pub const NGINX_CONF: &str = "nginx.conf";
pub const FPM_CONF: &str = "nginx-fpm.conf";
/// Hidden directory PHP-FPM reads extra pool configuration from
pub const FPM_CONF_DIR: &str = ".php.fpm.bp";
pub const FPM_SOCKET: &str = "php-fpm.socket";
/// Socket location when no layer directory is available
pub const TMP_FPM_SOCKET: &str = "/tmp/php-fpm.socket";

/// Where generated files and the FPM socket live.
///
/// Both config writers derive the socket path from the same layout, which
/// is what keeps nginx and PHP-FPM pointed at one socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Files go into a dedicated build layer
    Layer { layer_path: PathBuf },
    /// Files go into the application directory, socket under /tmp
    WorkingDir,
}

impl Layout {
    pub fn from_layer_path(layer_path: Option<PathBuf>) -> Self {
        match layer_path {
            Some(layer_path) => Layout::Layer { layer_path },
            None => Layout::WorkingDir,
        }
    }

    pub fn fpm_socket(&self) -> PathBuf {
        match self {
            Layout::Layer { layer_path } => layer_path.join(FPM_SOCKET),
            Layout::WorkingDir => PathBuf::from(TMP_FPM_SOCKET),
        }
    }

    pub fn nginx_conf_path(&self, working_dir: &Path) -> PathBuf {
        match self {
            Layout::Layer { layer_path } => layer_path.join(NGINX_CONF),
            Layout::WorkingDir => working_dir.join(NGINX_CONF),
        }
    }

    pub fn fpm_conf_path(working_dir: &Path) -> PathBuf {
        working_dir.join(FPM_CONF_DIR).join(FPM_CONF)
    }
}
