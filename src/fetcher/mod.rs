pub mod http_fetcher;
pub mod retry;

#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use thiserror::Error;

pub use retry::fetch_with_retry;

/// Which endpoint a request targets; selects per-request headers and timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Paginated listing index (XHR, JSON envelope)
    Listing,
    /// A master's profile page
    Detail,
    /// Phone number fragment (XHR, HTML)
    Contact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub kind: RequestKind,
}

impl FetchRequest {
    pub fn listing(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: RequestKind::Listing,
        }
    }

    pub fn detail(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: RequestKind::Detail,
        }
    }

    pub fn contact(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: RequestKind::Contact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Timeout => true,
            FetchError::HttpStatus(code) => *code == 429 || (500..600).contains(code),
            FetchError::Cancelled => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::HttpStatus(404 | 410))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::HttpStatus(status.as_u16())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// A single GET attempt. Retrying is layered on top by [`fetch_with_retry`].
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String, FetchError>;
}
