use clap::{Args, Subcommand};
use anyhow::Result;
use crate::config::{parser, validator};
use crate::Settings;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Validate a settings file
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Write a settings file with default values
    Init {
        #[arg(short, long, default_value = "php-nginx-config.toml")]
        config: PathBuf,

        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Check { config } => {
            println!("Checking settings: {}", config.display());

            let settings = Settings::from_file(&config)?;
            let warnings = settings.validate()?;

            if warnings.is_empty() {
                println!(" Settings are valid!");
                return Ok(());
            }

            println!("Settings loaded with warnings:\n");
            for warning in &warnings {
                println!("{}", warning);
            }

            if validator::has_fatal(&warnings) {
                anyhow::bail!("Settings file {} has errors", config.display());
            }

            Ok(())
        }

        ConfigCommand::Init { config, force } => {
            if config.exists() && !force {
                anyhow::bail!(
                    "Settings file {} already exists (use --force to replace it)",
                    config.display()
                );
            }

            parser::save_settings(&Settings::default(), &config)?;
            println!(" Settings written to {}", config.display());
            Ok(())
        }
    }
}
