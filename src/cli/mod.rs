pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gpuscout")]
#[command(about = "Scrape GPU listings into a canonical price catalog", long_about = None)]
pub struct Cli {
    /// Database file (default: platform data dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file (default: ~/.config/gpuscout/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of product pages fetched in parallel
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl a catalog and record what is on sale
    Crawl(CrawlArgs),
    /// Show how a product title is decomposed
    Normalize {
        /// Product title as listed by the vendor
        title: String,
    },
    /// List known GPUs
    List,
    /// Show one GPU and its recorded listings
    Show {
        /// Canonical identifier, e.g. ASUS-NVIDIA-RTX-4070-TI-STRIX
        identifier: String,
    },
    /// List supported sites
    Sites,
}

#[derive(Args, Debug, Default)]
pub struct CrawlArgs {
    /// Site to crawl (overrides config)
    #[arg(short, long)]
    pub site: Option<String>,

    /// Replay a recorded JSON crawl instead of launching a browser
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Stop after this many listing pages (overrides config)
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Backfill missing specs through the enrichment service
    #[arg(long)]
    pub enrich: bool,
}
