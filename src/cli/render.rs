use anyhow::Result;
use clap::{Args, ValueEnum};
use std::io::Write;

use super::GeneratorArgs;
use crate::nginx::{FpmConfigWriter, NginxConfigWriter};

#[derive(Args)]
pub struct RenderArgs {
    /// Which file to render
    #[arg(value_enum)]
    pub target: RenderTarget,

    #[command(flatten)]
    pub generator: GeneratorArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RenderTarget {
    /// nginx.conf
    Nginx,
    /// nginx-fpm.conf
    Fpm,
}

/// Prints a rendered file to stdout. Nothing is written or chmod-ed.
pub async fn run(args: RenderArgs) -> Result<()> {
    let settings = args.generator.settings()?;
    args.generator.init_logging(&settings)?;

    let layout = settings.generator.layout();
    let templates = settings.generator.template_source();

    let contents = match args.target {
        RenderTarget::Nginx => {
            NginxConfigWriter::new(templates)
                .render(&layout, &settings.generator.working_dir)?
                .contents
        }
        RenderTarget::Fpm => FpmConfigWriter::new(templates).render(&layout)?.contents,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&contents)?;
    stdout.flush()?;

    Ok(())
}
