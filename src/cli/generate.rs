use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::GeneratorArgs;
use crate::nginx::{ConfigWriter, FpmConfigWriter, Generated, Layout, NginxConfigWriter};

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub generator: GeneratorArgs,

    /// How to report the generated paths
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub async fn run(args: GenerateArgs) -> Result<()> {
    let settings = args.generator.settings()?;
    args.generator.init_logging(&settings)?;

    info!("php-nginx-config v{}", crate::VERSION);

    let layout = settings.generator.layout();
    let working_dir = settings.generator.working_dir.clone();
    let templates = settings.generator.template_source();

    let generated = generate_concurrently(
        Arc::new(NginxConfigWriter::new(templates.clone())),
        Arc::new(FpmConfigWriter::new(templates)),
        layout,
        working_dir,
    )
    .await?;

    match args.output {
        OutputFormat::Text => {
            println!("nginx.conf: {}", generated.nginx_conf.display());
            println!("nginx-fpm.conf: {}", generated.fpm_conf.display());
            println!("PHP_NGINX_PATH={}", generated.nginx_conf.display());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&generated)?);
        }
    }

    Ok(())
}

/// Runs both writers on the blocking pool. They write disjoint paths, so
/// nothing is shared beyond the layout they both read.
pub async fn generate_concurrently(
    nginx: Arc<dyn ConfigWriter>,
    fpm: Arc<dyn ConfigWriter>,
    layout: Layout,
    working_dir: PathBuf,
) -> Result<Generated> {
    let nginx_task = {
        let layout = layout.clone();
        let working_dir = working_dir.clone();
        tokio::task::spawn_blocking(move || nginx.write(&layout, &working_dir))
    };
    let fpm_task = tokio::task::spawn_blocking(move || fpm.write(&layout, &working_dir));

    let (nginx_conf, fpm_conf) = tokio::try_join!(nginx_task, fpm_task)
        .context("Config writer task failed")?;

    Ok(Generated {
        nginx_conf: nginx_conf.context("Failed to set up the Nginx configuration file")?,
        fpm_conf: fpm_conf.context("Failed to set up the Nginx-specific FPM configuration file")?,
    })
}
