use std::path::{Path, PathBuf};

use tracing::error;

use crate::app::{Result, ScrapeContext};
use crate::config::Config;
use crate::crawler::{CrawlReport, Crawler};
use crate::sink::{CsvSink, JsonSink, RecordSink};

/// Run a crawl with the context's config and write both outputs.
///
/// Records are written even when the crawl was cut short. A failing sink
/// doesn't stop the other one; the first failure is returned afterwards.
pub async fn scrape(ctx: &ScrapeContext) -> Result<CrawlReport> {
    let range = ctx.config.crawl.page_range();
    let report = Crawler::new(ctx)?.run(range).await?;

    println!(
        "Collected {} masters from {} pages ({})",
        report.records.len(),
        report.pages_visited,
        report.stop_reason
    );

    let sinks: [Box<dyn RecordSink>; 2] = [
        Box::new(JsonSink::new(&ctx.config.output.json_path)),
        Box::new(CsvSink::new(&ctx.config.output.csv_path)),
    ];
    write_all(&sinks, &report)?;

    Ok(report)
}

fn write_all(sinks: &[Box<dyn RecordSink>], report: &CrawlReport) -> Result<()> {
    let mut first_error = None;

    for sink in sinks {
        match sink.write(&report.records) {
            Ok(()) => println!("  wrote {}", sink.path().display()),
            Err(e) => {
                error!(path = %sink.path().display(), error = %e, "Failed to save records");
                eprintln!("  ! {} - {}", sink.path().display(), e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Config::default_config_path()?),
    }
}

pub fn show_config_path(explicit: Option<&Path>) -> Result<()> {
    let path = config_path(explicit)?;
    let state = if path.exists() { "" } else { " (not created yet)" };
    println!("{}{}", path.display(), state);
    Ok(())
}

pub fn init_config(explicit: Option<&Path>, force: bool) -> Result<()> {
    let path = config_path(explicit)?;

    if path.exists() && !force {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }

    Config::write_default(&path)?;
    println!("Wrote default config: {}", path.display());
    Ok(())
}
