//! HTTP table source
//!
//! Only compiled with the `remote` feature.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde_json::Value;

use super::source::TableSource;
use crate::config::SessionConfig;
use crate::error::{Result, SoundpackError};

/// Fetches tables over HTTPS, optionally through the forwarding proxy
pub struct HttpSource {
    client: Client,
    proxy_url: Option<String>,
}

impl HttpSource {
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("soundpack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SoundpackError::Config {
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            proxy_url: config.proxy_url.clone(),
        })
    }
}

impl TableSource for HttpSource {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let request = match &self.proxy_url {
            Some(proxy) => {
                debug!("GET {} via {}", url, proxy);
                self.client.post(proxy).form(&[("url", url)])
            }
            None => {
                debug!("GET {}", url);
                self.client.get(url)
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| SoundpackError::fetch(url, e))?;

        if !response.status().is_success() {
            return Err(SoundpackError::fetch(url, response.status()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SoundpackError::malformed(url, e.to_string()))
    }
}
