pub mod config;
pub mod generate;
pub mod render;

pub use config::ConfigArgs;
pub use generate::GenerateArgs;
pub use render::RenderArgs;

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::nginx::ProcessEnv;
use crate::Settings;

/// Options shared by every command that produces config files
#[derive(Args, Debug, Clone, Default)]
pub struct GeneratorArgs {
    /// Path to a settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Application directory [default: current directory]
    #[arg(short, long)]
    pub working_dir: Option<PathBuf>,

    /// Layer directory for nginx.conf and the FPM socket
    #[arg(short, long)]
    pub layer_path: Option<PathBuf>,

    /// Directory with nginx.conf and nginx-fpm.conf templates [default: built-in]
    #[arg(short, long)]
    pub templates_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, pretty, plain)
    #[arg(long)]
    pub log_format: Option<String>,
}

impl GeneratorArgs {
    /// Settings file values with command line flags applied on top
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };

        let generator = &mut settings.generator;
        if let Some(dir) = &self.working_dir {
            generator.working_dir = dir.clone();
        }
        if let Some(dir) = &self.layer_path {
            generator.layer_path = Some(dir.clone());
        }
        if let Some(dir) = &self.templates_dir {
            generator.templates_dir = Some(dir.clone());
        }

        generator.working_dir = absolute(&generator.working_dir)?;
        if let Some(dir) = generator.layer_path.take() {
            generator.layer_path = Some(absolute(&dir)?);
        }

        if let Some(level) = &self.log_level {
            settings.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            settings.logging.format = format.clone();
        }

        Ok(settings)
    }

    pub fn init_logging(&self, settings: &Settings) -> Result<()> {
        let level = crate::logging::effective_level(&settings.logging.level, &ProcessEnv);
        crate::logging::init_logging(&level, &settings.logging.format)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("Failed to resolve path: {}", path.display()))
}
