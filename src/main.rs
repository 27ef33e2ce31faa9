use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gpuscout::app::AppContext;
use gpuscout::cli::{commands, Cli, Commands};
use gpuscout::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(cli.db.clone(), config)?;

    match &cli.command {
        Commands::Crawl(args) => {
            commands::crawl(&ctx, args, cli.workers).await?;
        }
        Commands::Normalize { title } => {
            commands::normalize(&ctx, title)?;
        }
        Commands::List => {
            commands::list_gpus(&ctx)?;
        }
        Commands::Show { identifier } => {
            commands::show_gpu(&ctx, identifier)?;
        }
        Commands::Sites => {
            commands::list_sites()?;
        }
    }

    Ok(())
}
