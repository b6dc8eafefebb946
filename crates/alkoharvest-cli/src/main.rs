mod export;
mod harvest;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::export::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "alkoharvest-cli")]
#[command(about = "Alkoteka catalog harvester")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl the configured categories and write one record per product.
    Harvest {
        /// Category slug or URL to crawl; repeat for several. Overrides
        /// `ALKOHARVEST_START_CATEGORIES`.
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Listing page size. Overrides `ALKOHARVEST_PAGE_SIZE`.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: Option<u32>,

        /// Output file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = alkoharvest_core::load_harvest_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Harvest {
            categories,
            page_size,
            output,
            format,
        } => {
            let config = harvest::apply_overrides(config, &categories, page_size)?;
            harvest::run_harvest_command(&config, output.as_deref(), format).await
        }
    }
}

#[cfg(test)]
mod tests;
