//! Where remote tables come from

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{Result, SoundpackError};

/// Anything that can fetch a JSON document by URL
pub trait TableSource {
    fn fetch_json(&self, url: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// In-memory source serving fixed documents.
///
/// Used for offline sessions and tests; records every requested URL.
#[derive(Debug, Default)]
pub struct StaticSource {
    documents: HashMap<String, Value>,
    requests: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `document` for `url`
    pub fn with(mut self, url: impl Into<String>, document: Value) -> Self {
        self.documents.insert(url.into(), document);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, document: Value) {
        self.documents.insert(url.into(), document);
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// How many times `url` was requested
    pub fn request_count(&self, url: &str) -> usize {
        self.requests.lock().iter().filter(|u| *u == url).count()
    }
}

impl TableSource for StaticSource {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        self.requests.lock().push(url.to_string());
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| SoundpackError::fetch(url, "404 Not Found"))
    }
}
