pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "usta")]
#[command(about = "Scrape master profiles from the avtotemir.az directory", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/usta/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(short, long, global = true)]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl the directory and write JSON and CSV output
    Scrape(ScrapeArgs),
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file path in use
    Path,
    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Overrides for values from the config file.
#[derive(Args, Debug, Default)]
pub struct ScrapeArgs {
    /// First listing page
    #[arg(short, long)]
    pub start_page: Option<u32>,

    /// Last listing page, inclusive
    #[arg(short, long)]
    pub end_page: Option<u32>,

    /// Maximum number of listing pages
    #[arg(short, long)]
    pub max_pages: Option<u32>,

    /// Pause after each listing (ms)
    #[arg(long)]
    pub listing_delay_ms: Option<u64>,

    /// Pause after each listing page (ms)
    #[arg(long)]
    pub page_delay_ms: Option<u64>,

    /// Pause before each phone lookup (ms)
    #[arg(long)]
    pub contact_delay_ms: Option<u64>,

    /// Attempts per request, including the first
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// JSON output path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// CSV output path
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl ScrapeArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(start) = self.start_page {
            config.crawl.start_page = start;
        }
        if let Some(end) = self.end_page {
            config.crawl.end_page = Some(end);
        }
        if let Some(max) = self.max_pages {
            config.crawl.max_pages = Some(max);
        }
        if let Some(ms) = self.listing_delay_ms {
            config.crawl.listing_delay_ms = ms;
        }
        if let Some(ms) = self.page_delay_ms {
            config.crawl.page_delay_ms = ms;
        }
        if let Some(ms) = self.contact_delay_ms {
            config.crawl.contact_delay_ms = ms;
        }
        if let Some(attempts) = self.max_attempts {
            config.retry.max_attempts = attempts;
        }
        if let Some(path) = &self.json {
            config.output.json_path = path.clone();
        }
        if let Some(path) = &self.csv {
            config.output.csv_path = path.clone();
        }
    }
}
