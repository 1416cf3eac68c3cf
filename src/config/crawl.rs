use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crawler::PageRange;

/// Page bounds and politeness delays for a crawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// First listing page to fetch (default: 1)
    pub start_page: u32,

    /// Last listing page to fetch, inclusive
    pub end_page: Option<u32>,

    /// Maximum number of listing pages. Without an end page the crawl stops
    /// after 100 pages when this is unset
    pub max_pages: Option<u32>,

    /// Consecutive empty pages that end the crawl (default: 3)
    pub empty_page_limit: u32,

    /// Pause after each listing in milliseconds (default: 1000)
    pub listing_delay_ms: u64,

    /// Pause after each listing page in milliseconds (default: 2000)
    pub page_delay_ms: u64,

    /// Pause before each contact lookup in milliseconds (default: 500)
    pub contact_delay_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_page: 1,
            end_page: None,
            max_pages: None,
            empty_page_limit: 3,
            listing_delay_ms: 1000,
            page_delay_ms: 2000,
            contact_delay_ms: 500,
        }
    }
}

impl CrawlConfig {
    pub fn page_range(&self) -> PageRange {
        PageRange {
            start: self.start_page,
            end: self.end_page,
            max_pages: self.max_pages,
        }
    }

    pub fn listing_delay(&self) -> Duration {
        Duration::from_millis(self.listing_delay_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn contact_delay(&self) -> Duration {
        Duration::from_millis(self.contact_delay_ms)
    }

    /// No politeness delays at all. Used against local fixtures.
    pub fn without_delays(self) -> Self {
        Self {
            listing_delay_ms: 0,
            page_delay_ms: 0,
            contact_delay_ms: 0,
            ..self
        }
    }
}

/// Bounded retry with exponential backoff for transient fetch failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per request, including the first (default: 3)
    pub max_attempts: u32,

    /// Wait after the first failed attempt in milliseconds (default: 1000)
    pub base_delay_ms: u64,

    /// Growth factor applied to the wait after each further failure (default: 2.0)
    pub multiplier: f64,

    /// Upper bound for a single wait in milliseconds (default: 8000)
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            multiplier: 2.0,
            max_delay_ms: 8000,
        }
    }
}

impl RetryConfig {
    /// Wait before the attempt following failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as i32;
        let delay = self.base_delay_ms as f64 * self.multiplier.max(1.0).powi(exponent);
        Duration::from_millis(delay.min(self.max_delay_ms as f64) as u64)
    }

    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            ..Self::default()
        }
    }
}

/// Output file locations for the record sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: PathBuf::from("avtotemir_masters.json"),
            csv_path: PathBuf::from("avtotemir_masters.csv"),
        }
    }
}
