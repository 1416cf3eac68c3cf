//! # usta
//!
//! A polite, sequential scraper for the avtotemir.az master directory.
//!
//! ## Architecture
//!
//! ```text
//! Listing page → Listing refs → Profile page → Contact lookup → Records → Sinks
//! ```
//!
//! - [`crawler`]: pagination loop with the empty-page stop rule
//! - [`fetcher`]: HTTP client with bounded retries
//! - [`parser`]: listing, profile and contact extraction
//! - [`sink`]: JSON and CSV output
//!
//! ## Quick Start
//!
//! ```bash
//! # Crawl everything (stops after three empty pages in a row)
//! usta scrape
//!
//! # A slice of the directory, without delays
//! usta scrape --start-page 10 --end-page 12 --listing-delay-ms 0 --page-delay-ms 0
//!
//! # Write a commented config file
//! usta config init
//! ```

/// Crawl context and error handling.
///
/// The [`ScrapeContext`](app::ScrapeContext) struct carries the fetcher,
/// configuration and cancellation token through a crawl.
pub mod app;

/// Command-line interface using clap.
///
/// - `scrape` - Crawl and write JSON + CSV
/// - `config path` - Show the config file location
/// - `config init` - Write a default config file
pub mod cli;

/// Configuration loaded from `~/.config/usta/config.toml`.
pub mod config;

/// The pagination controller and contact resolver.
pub mod crawler;

/// Core domain models.
///
/// - [`MasterRecord`](domain::MasterRecord): one scraped profile
/// - [`ListingRef`](domain::ListingRef): a listing card before its profile is fetched
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for a single request
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`fetch_with_retry`](fetcher::fetch_with_retry): bounded retry with backoff
pub mod fetcher;

/// HTML extraction for listing, profile and contact pages.
pub mod parser;

/// Output writers.
///
/// - [`JsonSink`](sink::JsonSink): JSON array
/// - [`CsvSink`](sink::CsvSink): flat table, list fields joined with `; `
pub mod sink;
