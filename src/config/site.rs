use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const PAGE_PLACEHOLDER: &str = "{page}";
pub const ID_PLACEHOLDER: &str = "{id}";

/// Where and how to talk to the directory site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL used to absolutize profile links and images
    pub base_url: String,

    /// Listing index URL, `{page}` is replaced with the page number
    pub listing_url: String,

    /// Contact endpoint URL, `{id}` is replaced with the listing id
    pub contact_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Accept-Language sent with every request
    pub accept_language: String,

    /// Referer sent with every request (default: the base URL)
    pub referer: Option<String>,

    /// Additional headers sent with every request
    pub headers: BTreeMap<String, String>,

    /// Timeout for listing and detail requests in seconds (default: 30)
    pub timeout_secs: u64,

    /// Timeout for contact requests in seconds (default: 15)
    pub contact_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://avtotemir.az".to_string(),
            listing_url: "https://avtotemir.az/all?page={page}".to_string(),
            contact_url: "https://avtotemir.az/contact-phone/{id}/master".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "en-GB,en-US;q=0.9,en;q=0.8,ru;q=0.7,az;q=0.6".to_string(),
            referer: None,
            headers: BTreeMap::from([("DNT".to_string(), "1".to_string())]),
            timeout_secs: 30,
            contact_timeout_secs: 15,
        }
    }
}

impl SiteConfig {
    pub fn listing_url_for(&self, page: u32) -> String {
        self.listing_url.replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    pub fn contact_url_for(&self, id: &str) -> String {
        self.contact_url.replace(ID_PLACEHOLDER, id)
    }

    pub fn referer(&self) -> &str {
        self.referer.as_deref().unwrap_or(&self.base_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn contact_timeout(&self) -> Duration {
        Duration::from_secs(self.contact_timeout_secs)
    }
}
