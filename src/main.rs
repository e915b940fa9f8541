use clap::{Parser, Subcommand};
use php_nginx_config::cli;
use anyhow::Result;

#[derive(Parser)]
#[command(name = "php-nginx-config")]
#[command(version = php_nginx_config::VERSION)]
#[command(about = "Generates nginx and PHP-FPM configuration for PHP applications", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write nginx.conf and nginx-fpm.conf
    Generate(cli::generate::GenerateArgs),

    /// Print a rendered config file without writing it
    Render(cli::render::RenderArgs),

    /// Settings file management
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => cli::generate::run(args).await,
        Commands::Render(args) => cli::render::run(args).await,
        Commands::Config(args) => cli::config::run(args).await,
    }
}
