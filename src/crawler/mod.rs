//! The pagination loop: listing pages, then each listing's profile and phones.
//!
//! ```text
//! page N → listing refs → detail page → contact lookup → MasterRecord
//! ```
//!
//! Work is strictly sequential. Failures on one page or listing are logged
//! and skipped; only the empty-page streak, the page bound or cancellation
//! end a crawl, and whatever was collected is always returned.

mod contact;

pub use contact::ContactResolver;

use std::fmt;

use tracing::{info, warn};
use url::Url;

use crate::app::{Result, ScrapeContext, UstaError};
use crate::domain::{ListingRef, MasterRecord};
use crate::fetcher::{FetchError, FetchRequest};
use crate::parser::{parse_detail, parse_listing};

pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Pages to visit: from `start` up to `end`, or `max_pages` pages, whichever
/// comes first. With neither bound the crawl is capped at [`DEFAULT_MAX_PAGES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: Option<u32>,
    pub max_pages: Option<u32>,
}

impl PageRange {
    pub fn new(start: u32) -> Self {
        Self {
            start,
            end: None,
            max_pages: None,
        }
    }

    pub fn end(self, end: u32) -> Self {
        Self {
            end: Some(end),
            ..self
        }
    }

    pub fn max_pages(self, max_pages: u32) -> Self {
        Self {
            max_pages: Some(max_pages),
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.start == 0 {
            return Err(UstaError::InvalidRange("pages start at 1".into()));
        }
        if self.max_pages == Some(0) {
            return Err(UstaError::InvalidRange("max pages must be at least 1".into()));
        }
        if let Some(end) = self.end {
            if end < self.start {
                return Err(UstaError::InvalidRange(format!(
                    "end page {} is before start page {}",
                    end, self.start
                )));
            }
        }
        Ok(())
    }

    /// Last page to visit, inclusive.
    pub fn last_page(&self) -> u32 {
        let by_count = |max: u32| self.start.saturating_add(max.saturating_sub(1));
        match (self.end, self.max_pages) {
            (Some(end), Some(max)) => end.min(by_count(max)),
            (Some(end), None) => end,
            (None, max) => by_count(max.unwrap_or(DEFAULT_MAX_PAGES)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every page in the range was visited
    BoundReached,
    /// Too many empty pages in a row
    EndOfListings,
    /// The cancellation token fired
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::BoundReached => write!(f, "page bound reached"),
            StopReason::EndOfListings => write!(f, "end of listings"),
            StopReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    pub records: Vec<MasterRecord>,
    pub pages_visited: u32,
    pub last_page: Option<u32>,
    pub stop_reason: StopReason,
}

/// What fetching one listing page produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Listings(Vec<ListingRef>),
    Empty,
    Failed(PageFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFailure {
    Fetch(FetchError),
    Parse(String),
}

impl fmt::Display for PageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageFailure::Fetch(e) => write!(f, "{}", e),
            PageFailure::Parse(e) => write!(f, "parse error: {}", e),
        }
    }
}

pub struct Crawler<'a> {
    ctx: &'a ScrapeContext,
    contacts: ContactResolver<'a>,
    base: Url,
}

impl<'a> Crawler<'a> {
    pub fn new(ctx: &'a ScrapeContext) -> Result<Self> {
        let base = Url::parse(&ctx.config.site.base_url)?;
        Ok(Self {
            ctx,
            contacts: ContactResolver::new(ctx),
            base,
        })
    }

    /// Crawl `range` and return every record collected.
    ///
    /// Only an invalid range is an error. Page and listing failures degrade
    /// to empty pages and skipped listings.
    pub async fn run(&self, range: PageRange) -> Result<CrawlReport> {
        range.validate()?;

        let crawl = &self.ctx.config.crawl;
        let last = range.last_page();

        let mut results: Vec<MasterRecord> = Vec::new();
        let mut consecutive_empty = 0u32;
        let mut pages_visited = 0u32;
        let mut last_visited = None;
        let mut stop_reason = StopReason::BoundReached;

        info!(start = range.start, last, "Starting crawl");

        'pages: for page in range.start..=last {
            if self.ctx.is_cancelled() {
                stop_reason = StopReason::Cancelled;
                break;
            }

            pages_visited += 1;
            last_visited = Some(page);

            let listings = match self.fetch_page(page).await {
                PageOutcome::Listings(listings) => listings,
                PageOutcome::Empty => Vec::new(),
                PageOutcome::Failed(failure) => {
                    warn!(page, error = %failure, "Listing page failed, counting it as empty");
                    Vec::new()
                }
            };

            if self.ctx.is_cancelled() {
                stop_reason = StopReason::Cancelled;
                break;
            }

            if listings.is_empty() {
                consecutive_empty += 1;
                warn!(
                    page,
                    consecutive_empty, "Page {} returned no listings", page
                );

                if consecutive_empty >= crawl.empty_page_limit {
                    info!(page, "Reached end of listings at page {}", page);
                    stop_reason = StopReason::EndOfListings;
                    break;
                }
            } else {
                consecutive_empty = 0;
                info!(page, count = listings.len(), "Found {} masters on page", listings.len());

                for listing in &listings {
                    if self.ctx.is_cancelled() {
                        stop_reason = StopReason::Cancelled;
                        break 'pages;
                    }

                    if let Some(record) = self.scrape_listing(listing).await {
                        results.push(record);
                    }

                    if !self.ctx.pause(crawl.listing_delay()).await {
                        stop_reason = StopReason::Cancelled;
                        break 'pages;
                    }
                }

                info!(
                    "Completed page {}. Total masters scraped: {}",
                    page,
                    results.len()
                );
            }

            if page < last && !self.ctx.pause(crawl.page_delay()).await {
                stop_reason = StopReason::Cancelled;
                break;
            }
        }

        info!(
            reason = %stop_reason,
            pages_visited,
            "Scraping completed. Total masters scraped: {}",
            results.len()
        );

        Ok(CrawlReport {
            records: results,
            pages_visited,
            last_page: last_visited,
            stop_reason,
        })
    }

    async fn fetch_page(&self, page: u32) -> PageOutcome {
        let url = self.ctx.config.site.listing_url_for(page);
        info!(page, "Fetching page {}...", page);

        match self.ctx.fetch(&FetchRequest::listing(url)).await {
            Ok(body) => match parse_listing(&body, &self.base) {
                Ok(listings) if listings.is_empty() => PageOutcome::Empty,
                Ok(listings) => PageOutcome::Listings(listings),
                Err(e) => PageOutcome::Failed(PageFailure::Parse(e.to_string())),
            },
            Err(e) if e.is_not_found() => PageOutcome::Empty,
            Err(e) => PageOutcome::Failed(PageFailure::Fetch(e)),
        }
    }

    /// Profile plus phones for one listing, or `None` if it has to be skipped.
    async fn scrape_listing(&self, listing: &ListingRef) -> Option<MasterRecord> {
        info!(url = %listing.url, "Scraping profile");

        let html = match self.ctx.fetch(&FetchRequest::detail(&listing.url)).await {
            Ok(html) => html,
            Err(FetchError::Cancelled) => return None,
            Err(e) if e.is_not_found() => {
                warn!(url = %listing.url, "Profile page not found, skipping");
                return None;
            }
            Err(e) => {
                warn!(url = %listing.url, error = %e, "Failed to fetch profile, skipping");
                return None;
            }
        };

        let record = match parse_detail(&html, listing, &self.base) {
            Ok(record) => record,
            Err(e) => {
                warn!(url = %listing.url, error = %e, "Discarding malformed profile");
                return None;
            }
        };

        let phones = self.contacts.resolve(&record.id).await;
        let record = record.with_phone_numbers(phones);

        info!(id = %record.id, "Successfully scraped: {}", record.display_name());
        Some(record)
    }
}
