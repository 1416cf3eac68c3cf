use tracing::{debug, warn};

use crate::app::ScrapeContext;
use crate::fetcher::FetchRequest;
use crate::parser::parse_phone_numbers;

/// Looks up a master's phone numbers through the contact endpoint.
pub struct ContactResolver<'a> {
    ctx: &'a ScrapeContext,
}

impl<'a> ContactResolver<'a> {
    pub fn new(ctx: &'a ScrapeContext) -> Self {
        Self { ctx }
    }

    /// Never fails: an unreachable endpoint yields no numbers.
    pub async fn resolve(&self, id: &str) -> Vec<String> {
        if id.is_empty() {
            return Vec::new();
        }

        if !self.ctx.pause(self.ctx.config.crawl.contact_delay()).await {
            return Vec::new();
        }

        let url = self.ctx.config.site.contact_url_for(id);
        match self.ctx.fetch(&FetchRequest::contact(url)).await {
            Ok(html) => {
                let phones = parse_phone_numbers(&html);
                debug!(id, count = phones.len(), "Resolved phone numbers");
                phones
            }
            Err(e) => {
                warn!(id, error = %e, "Failed to fetch phone numbers");
                Vec::new()
            }
        }
    }
}
