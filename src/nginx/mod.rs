//! nginx and PHP-FPM configuration generation.
//!
//! Each writer runs the same steps: resolve a data record, render the
//! template, write the file, then widen its group permissions so nginx
//! and PHP-FPM, running as different users, can share it.

pub mod data;
pub mod env;
pub mod error;
pub mod layout;
pub mod lister;
pub mod permissions;
pub mod template;
pub mod writer;

pub use data::{ConfigDataResolver, FastCgiConfigData, WebServerConfigData};
pub use env::{EnvProvider, MapEnv, ProcessEnv};
pub use error::{ConfigError, Stage};
pub use layout::Layout;
pub use lister::{DirectoryLister, FragmentPattern, FsLister, StaticLister};
pub use permissions::{Grant, PermissionEnforcer};
pub use template::{Downstream, Template, TemplateRenderer, TemplateSource};
pub use writer::{generate_all, ConfigWriter, FpmConfigWriter, Generated, NginxConfigWriter, Rendered};
