// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read access to stored content through the public gateway.

use std::time::Duration;

use reqwest::Client;

use crate::storage::ContentCache;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const CONTENT_CACHE_CAPACITY: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Http(String),

    #[error("Gateway returned {status} for {content_id}")]
    Status { status: u16, content_id: String },
}

/// Gateway client with an LRU of fetched content.
pub struct Gateway {
    base_url: String,
    http: Client,
    cache: ContentCache,
}

impl Gateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            cache: ContentCache::new(CONTENT_CACHE_CAPACITY),
        }
    }

    /// Public URL of a content id.
    pub fn url_for(&self, content_id: &str) -> String {
        format!("{}/{}", self.base_url, content_id)
    }

    /// Raw content as text.
    pub async fn fetch_text(&self, content_id: &str) -> Result<String, GatewayError> {
        if let Some(text) = self.cache.get(content_id) {
            return Ok(text);
        }

        let response = self
            .http
            .get(self.url_for(content_id))
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Status {
                status: response.status().as_u16(),
                content_id: content_id.to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        self.cache.put(content_id, text.clone());
        Ok(text)
    }

    /// Metadata-only existence probe.
    pub async fn exists(&self, content_id: &str) -> Result<bool, GatewayError> {
        let response = self
            .http
            .head(self.url_for(content_id))
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        Ok(response.status().is_success())
    }
}
