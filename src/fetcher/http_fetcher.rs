use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT,
};
use reqwest::Client;

use crate::app::Result;
use crate::config::{ConfigError, SiteConfig};
use crate::fetcher::{FetchError, FetchRequest, Fetcher, RequestKind};

const X_REQUESTED_WITH: &str = "x-requested-with";
const XHR: &str = "XMLHttpRequest";

const ACCEPT_JSON: &str = "application/json, text/javascript, */*; q=0.01";
const ACCEPT_FRAGMENT: &str = "text/html, */*; q=0.01";
const ACCEPT_PAGE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    contact_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(site: &SiteConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers(site)?)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            timeout: site.timeout(),
            contact_timeout: site.contact_timeout(),
        })
    }

    fn request_headers(kind: RequestKind) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let accept = match kind {
            RequestKind::Listing => ACCEPT_JSON,
            RequestKind::Contact => ACCEPT_FRAGMENT,
            RequestKind::Detail => ACCEPT_PAGE,
        };
        headers.insert(ACCEPT, HeaderValue::from_static(accept));

        if kind != RequestKind::Detail {
            headers.insert(
                HeaderName::from_static(X_REQUESTED_WITH),
                HeaderValue::from_static(XHR),
            );
        }

        headers
    }

    fn timeout_for(&self, kind: RequestKind) -> Duration {
        match kind {
            RequestKind::Contact => self.contact_timeout,
            RequestKind::Listing | RequestKind::Detail => self.timeout,
        }
    }
}

/// Browser-like headers sent with every request.
fn default_headers(site: &SiteConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, header_value("user_agent", &site.user_agent)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept_language", &site.accept_language)?,
    );
    headers.insert(REFERER, header_value("referer", site.referer())?);

    for (name, value) in &site.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::Invalid(format!("invalid header name: {name}")))?;
        headers.insert(name, header_value("headers", value)?);
    }

    Ok(headers)
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| ConfigError::Invalid(format!("site.{field} is not a valid header value")).into())
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> std::result::Result<String, FetchError> {
        let response = self
            .client
            .get(&request.url)
            .headers(Self::request_headers(request.kind))
            .timeout(self.timeout_for(request.kind))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_include_browser_identity() {
        let site = SiteConfig::default();
        let headers = default_headers(&site).unwrap();

        assert!(headers[USER_AGENT].to_str().unwrap().starts_with("Mozilla/5.0"));
        assert_eq!(headers[REFERER], "https://avtotemir.az");
        assert_eq!(headers["dnt"], "1");
    }

    #[test]
    fn test_invalid_extra_header_is_rejected() {
        let mut site = SiteConfig::default();
        site.headers.insert("bad header".into(), "x".into());

        assert!(default_headers(&site).is_err());
    }

    #[test]
    fn test_xhr_headers_per_kind() {
        let listing = HttpFetcher::request_headers(RequestKind::Listing);
        assert_eq!(listing[X_REQUESTED_WITH], XHR);
        assert_eq!(listing[ACCEPT], ACCEPT_JSON);

        let contact = HttpFetcher::request_headers(RequestKind::Contact);
        assert_eq!(contact[X_REQUESTED_WITH], XHR);
        assert_eq!(contact[ACCEPT], ACCEPT_FRAGMENT);

        let detail = HttpFetcher::request_headers(RequestKind::Detail);
        assert!(detail.get(X_REQUESTED_WITH).is_none());
    }

    #[test]
    fn test_contact_requests_use_shorter_timeout() {
        let fetcher = HttpFetcher::new(&SiteConfig::default()).unwrap();
        assert_eq!(fetcher.timeout_for(RequestKind::Contact), Duration::from_secs(15));
        assert_eq!(fetcher.timeout_for(RequestKind::Detail), Duration::from_secs(30));
    }
}
