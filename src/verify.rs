// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! On-demand permanence checks for a single record.

use std::sync::Arc;

use crate::gateway::Gateway;
use crate::models::Verification;
use crate::storage::LocalCache;
use crate::uploader::StorageClient;

/// Decides whether a content id is provably stored.
///
/// A cached receipt is checked cryptographically; without one, the gateway
/// is asked whether it serves the content. Nothing here returns an error.
pub struct ReceiptVerifier {
    cache: Arc<LocalCache>,
    storage: Arc<StorageClient>,
    gateway: Arc<Gateway>,
}

impl ReceiptVerifier {
    pub fn new(cache: Arc<LocalCache>, storage: Arc<StorageClient>, gateway: Arc<Gateway>) -> Self {
        Self {
            cache,
            storage,
            gateway,
        }
    }

    /// `true` only when a cached receipt exists and its proof holds.
    pub async fn verify(&self, content_id: &str) -> bool {
        self.check(content_id).await == Verification::Verified
    }

    pub async fn check(&self, content_id: &str) -> Verification {
        let receipt = match self.cache.receipt(content_id) {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(content_id = %content_id, error = %e, "Receipt lookup failed");
                None
            }
        };

        if let Some(receipt) = receipt {
            return match self.storage.verify_receipt(&receipt).await {
                Ok(true) => Verification::Verified,
                Ok(false) => {
                    tracing::warn!(content_id = %content_id, "Receipt signature does not verify");
                    Verification::NotFound
                }
                Err(e) => {
                    tracing::warn!(content_id = %content_id, error = %e, "Receipt could not be checked");
                    Verification::NotFound
                }
            };
        }

        match self.gateway.exists(content_id).await {
            Ok(true) => Verification::ExistsOnly,
            Ok(false) => Verification::NotFound,
            Err(e) => {
                tracing::warn!(content_id = %content_id, error = %e, "Gateway probe failed");
                Verification::NotFound
            }
        }
    }
}
