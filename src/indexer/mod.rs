// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Remote Index
//!
//! Lists an author's haiku from the storage network's GraphQL index.
//!
//! ## Strategy
//!
//! 1. **Query**: one page of transactions tagged with the application id and
//!    the author address, newest ledger height first.
//! 2. **Hydrate**: content for every match is fetched from the gateway
//!    concurrently; matches whose content cannot be fetched are dropped.
//! 3. **Fallback**: if the query itself fails, the local cache answers
//!    instead. The index is authoritative but fallible; the cache is always
//!    there.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::gateway::Gateway;
use crate::models::{
    Tag, UploadRecord, TAG_APPLICATION_ID, TAG_TIMESTAMP, TAG_TOPIC, TAG_USER, UNKNOWN_TOPIC,
};
use crate::storage::LocalCache;

/// Results requested per query.
pub const PAGE_SIZE: u32 = 50;

/// Upper bound on one index query, including reading the body.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(15);

const AUTHOR_QUERY: &str = r#"
query HaikuByAuthor($tags: [TagFilter!], $first: Int) {
  transactions(tags: $tags, sort: HEIGHT_DESC, first: $first) {
    edges {
      node {
        id
        tags { name value }
      }
    }
  }
}
"#;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("index request failed: {0}")]
    Http(String),

    #[error("index returned status {0}")]
    Status(u16),

    #[error("index reported errors: {0}")]
    GraphQl(String),

    #[error("invalid index response: {0}")]
    InvalidResponse(String),

    #[error("index did not answer within {0:?}")]
    Timeout(Duration),
}

// =============================================================================
// Response shape
// =============================================================================

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<QueryData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    transactions: Connection,
}

#[derive(Debug, Deserialize)]
struct Connection {
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: IndexedNode,
}

/// One indexed upload: its id and tags.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IndexedNode {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl IndexedNode {
    fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value.as_str())
    }
}

// =============================================================================
// RemoteIndex
// =============================================================================

pub struct RemoteIndex {
    graphql_url: String,
    app_name: String,
    http: Client,
    query_timeout: Duration,
    gateway: Arc<Gateway>,
    cache: Arc<LocalCache>,
}

impl RemoteIndex {
    pub fn new(
        graphql_url: &str,
        app_name: &str,
        http: Client,
        gateway: Arc<Gateway>,
        cache: Arc<LocalCache>,
    ) -> Self {
        Self {
            graphql_url: graphql_url.to_string(),
            app_name: app_name.to_string(),
            http,
            query_timeout: QUERY_TIMEOUT,
            gateway,
            cache,
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Haiku authored by `address`, newest first.
    ///
    /// Never fails: index errors fall back to the local cache, and cache
    /// errors to an empty list.
    pub async fn list_for_author(&self, address: &str) -> Vec<UploadRecord> {
        match self.query_author(address).await {
            Ok(nodes) => self.hydrate(address, nodes).await,
            Err(e) => {
                tracing::warn!(author = %address, error = %e, "Index query failed, using local cache");
                self.cache.list(address).unwrap_or_else(|e| {
                    tracing::warn!(author = %address, error = %e, "Local cache unavailable");
                    Vec::new()
                })
            }
        }
    }

    /// Raw index matches for an author.
    pub async fn query_author(&self, address: &str) -> Result<Vec<IndexedNode>, QueryError> {
        let body = json!({
            "query": AUTHOR_QUERY,
            "variables": {
                "tags": [
                    { "name": TAG_APPLICATION_ID, "values": [self.app_name] },
                    { "name": TAG_USER, "values": author_values(address) },
                ],
                "first": PAGE_SIZE,
            },
        });

        tokio::time::timeout(self.query_timeout, self.send_query(&body))
            .await
            .map_err(|_| QueryError::Timeout(self.query_timeout))?
    }

    async fn send_query(&self, body: &serde_json::Value) -> Result<Vec<IndexedNode>, QueryError> {
        let response = self
            .http
            .post(&self.graphql_url)
            .json(body)
            .send()
            .await
            .map_err(|e| QueryError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QueryError::Status(response.status().as_u16()));
        }

        let parsed: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| QueryError::InvalidResponse(e.to_string()))?;

        if !parsed.errors.is_empty() {
            let messages: Vec<_> = parsed.errors.into_iter().map(|e| e.message).collect();
            return Err(QueryError::GraphQl(messages.join("; ")));
        }

        let data = parsed
            .data
            .ok_or_else(|| QueryError::InvalidResponse("missing data".to_string()))?;
        Ok(data.transactions.edges.into_iter().map(|e| e.node).collect())
    }

    async fn hydrate(&self, address: &str, nodes: Vec<IndexedNode>) -> Vec<UploadRecord> {
        let fetches = nodes.iter().map(|node| self.gateway.fetch_text(&node.id));
        let contents = join_all(fetches).await;

        let total = nodes.len();
        let records: Vec<_> = nodes
            .into_iter()
            .zip(contents)
            .filter_map(|(node, content)| match content {
                Ok(text) => Some(record_from_node(&node, text, address)),
                Err(e) => {
                    tracing::debug!(content_id = %node.id, error = %e, "Dropping unfetchable entry");
                    None
                }
            })
            .collect();

        tracing::debug!(author = %address, matched = total, returned = records.len(), "Index listing");
        records
    }
}

/// The address as given plus its lowercase form.
fn author_values(address: &str) -> Vec<String> {
    let mut values = vec![address.to_string()];
    let lower = address.to_lowercase();
    if lower != address {
        values.push(lower);
    }
    values
}

fn record_from_node(node: &IndexedNode, text: String, queried: &str) -> UploadRecord {
    let created_at = node
        .tag(TAG_TIMESTAMP)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

    UploadRecord {
        content_id: node.id.clone(),
        text,
        topic: node.tag(TAG_TOPIC).unwrap_or(UNKNOWN_TOPIC).to_string(),
        created_at,
        author_address: node.tag(TAG_USER).unwrap_or(queried).to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
