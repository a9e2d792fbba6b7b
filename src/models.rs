// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Journal Data Models
//!
//! Records, receipts and tags shared by the storage client, the local cache,
//! the remote index and the HTTP API. All types derive `Serialize`,
//! `Deserialize`, and `ToSchema` so they flow straight into JSON responses
//! and the OpenAPI document.
//!
//! Field names on the wire follow the persisted format of the local store
//! (`id`, `text`, `topic`, `timestamp`, `author`), so cache entries written by
//! earlier sessions stay readable.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Application id tagged on every upload and used to find them again.
pub const APP_NAME: &str = "HaikuJournal";

pub const TAG_APPLICATION_ID: &str = "application-id";
pub const TAG_USER: &str = "user";
pub const TAG_TOPIC: &str = "topic";
pub const TAG_CONTENT_TYPE: &str = "content-type";
pub const TAG_TIMESTAMP: &str = "timestamp";

pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Topic used when an indexed upload carries no topic tag.
pub const UNKNOWN_TOPIC: &str = "Unknown";

// =============================================================================
// Tags
// =============================================================================

/// A name/value pair attached to an upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The tag set every haiku upload carries, in order.
///
/// The index can only find a record again through `application-id` and
/// `user`; `topic` and `timestamp` let it be rebuilt without the cache.
pub fn haiku_tags(author: &str, topic: &str, timestamp_ms: i64) -> Vec<Tag> {
    vec![
        Tag::new(TAG_APPLICATION_ID, APP_NAME),
        Tag::new(TAG_USER, author),
        Tag::new(TAG_TOPIC, topic),
        Tag::new(TAG_CONTENT_TYPE, CONTENT_TYPE_TEXT),
        Tag::new(TAG_TIMESTAMP, timestamp_ms.to_string()),
    ]
}

// =============================================================================
// Records and receipts
// =============================================================================

/// One haiku entry as stored permanently.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UploadRecord {
    /// Content id assigned by the network.
    #[serde(rename = "id")]
    pub content_id: String,
    pub text: String,
    pub topic: String,
    /// Creation time in epoch milliseconds.
    #[serde(rename = "timestamp")]
    pub created_at: i64,
    #[serde(rename = "author")]
    pub author_address: String,
}

impl UploadRecord {
    /// Case-insensitive author match (addresses may arrive checksummed or not).
    pub fn is_authored_by(&self, address: &str) -> bool {
        self.author_address.eq_ignore_ascii_case(address)
    }
}

/// Proof returned by the bundler when it accepts an upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    /// Bundler timestamp in epoch milliseconds.
    pub timestamp: u64,
    #[serde(rename = "version")]
    pub protocol_version: String,
    /// Base64url-encoded signature over the receipt fields.
    pub signature: String,
    /// Base64url-encoded public key of the bundler that signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_height: Option<u64>,
}

// =============================================================================
// Wallet and funding
// =============================================================================

/// Current wallet connection as seen by the UI.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    pub is_connected: bool,
    pub address: Option<String>,
    /// Prepaid bundler balance as a decimal string.
    pub balance: String,
}

impl Default for WalletState {
    fn default() -> Self {
        Self {
            is_connected: false,
            address: None,
            balance: "0".to_string(),
        }
    }
}

/// Handle for a submitted funding transfer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FundTx {
    /// On-chain transaction hash.
    pub id: String,
    /// Amount in atomic units.
    pub quantity: String,
    /// Bundler deposit address.
    pub target: String,
}

/// Outcome of checking one record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verification {
    /// Cached receipt present and its signature checks out.
    Verified,
    /// No cached receipt, but the gateway serves the content.
    ExistsOnly,
    NotFound,
}

// =============================================================================
// API requests and responses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    /// Prepaid balance as a decimal string.
    pub balance: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FundRequest {
    /// Whole tokens, e.g. `"0.01"`.
    pub amount: String,
    /// Wait for the bundler to credit the transfer before responding.
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FundResponse {
    pub tx: FundTx,
    /// Balance after funding (or after settlement when waited for).
    pub balance: String,
    /// Present only when the request asked to wait.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadRequest {
    pub text: String,
    pub topic: String,
    /// Ignored when it differs from the signing wallet.
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub receipt: Receipt,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    pub id: String,
    pub verified: bool,
    pub status: Verification,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UrlResponse {
    pub id: String,
    pub url: String,
}
