use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::{fetch_with_retry, FetchError, FetchRequest, Fetcher};

/// Everything a crawl needs, built once and passed down explicitly.
pub struct ScrapeContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    cancel: CancellationToken,
}

impl ScrapeContext {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.site)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            config,
            fetcher,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the crawl when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fetch with the configured retry policy.
    pub async fn fetch(&self, request: &FetchRequest) -> std::result::Result<String, FetchError> {
        fetch_with_retry(self.fetcher.as_ref(), request, &self.config.retry, &self.cancel).await
    }

    /// Politeness pause. Returns `false` if cancelled before it elapsed.
    pub async fn pause(&self, duration: Duration) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        if duration.is_zero() {
            return true;
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.cancel.cancelled() => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::scripted::ScriptedFetcher;

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = Config::default();
        config.site.contact_url = "https://avtotemir.az/contact-phone".into();
        assert!(ScrapeContext::new(config).is_err());
    }

    #[tokio::test]
    async fn test_pause_is_cut_short_by_cancellation() {
        let ctx = ScrapeContext::with_fetcher(Config::default(), Arc::new(ScriptedFetcher::new()));
        let token = ctx.cancel_token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        assert!(!ctx.pause(Duration::from_secs(60)).await);
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_zero_pause_returns_immediately() {
        let ctx = ScrapeContext::with_fetcher(Config::default(), Arc::new(ScriptedFetcher::new()));
        assert!(ctx.pause(Duration::ZERO).await);
    }
}
