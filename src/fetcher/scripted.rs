//! In-memory [`Fetcher`] standing in for the directory site in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::fetcher::{FetchError, FetchRequest, Fetcher};

/// Replies are served per URL in the order they were added; the last reply
/// repeats. Unknown URLs answer 404.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    replies: Mutex<HashMap<String, Vec<Result<String, FetchError>>>>,
    log: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(self, url: &str, body: impl Into<String>) -> Self {
        self.reply(url, Ok(body.into()))
    }

    pub(crate) fn fail(self, url: &str, error: FetchError) -> Self {
        self.reply(url, Err(error))
    }

    fn reply(self, url: &str, reply: Result<String, FetchError>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push(reply);
        self
    }

    /// Every URL requested so far, in order.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn hits(&self, url: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String, FetchError> {
        self.log.lock().unwrap().push(request.url.clone());

        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(&request.url) {
            Some(queue) if queue.len() > 1 => queue.remove(0),
            Some(queue) => queue[0].clone(),
            None => Err(FetchError::HttpStatus(404)),
        }
    }
}
