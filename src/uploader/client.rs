// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session-scoped access to the storage network.

use std::sync::Arc;

use alloy::primitives::U256;
use tokio::sync::{Mutex, RwLock};

use super::receipt::verify_receipt_signature;
use super::{Uploader, UploaderError, UploaderFactory};
use crate::blockchain::{from_atomic, to_atomic};
use crate::error::JournalError;
use crate::models::{FundTx, Receipt, Tag};
use crate::wallet::WalletSigner;

/// Smallest prepaid balance (in whole tokens) that allows an upload.
pub const MIN_UPLOAD_BALANCE: &str = "0.0001";

/// Owns the session's uploader.
///
/// The uploader is built on first use and reused afterwards. Initialization
/// runs under the `init` lock, so callers racing the first `acquire()` wait
/// for and share one instance. The uploader is published to `uploader` only
/// once ready; a failed initialization leaves it empty. Readers of the
/// published slot never wait on an initialization in flight.
pub struct StorageClient {
    signer: Option<Arc<dyn WalletSigner>>,
    factory: Arc<dyn UploaderFactory>,
    required_chain_id: u64,
    symbol: String,
    decimals: u8,
    init: Mutex<()>,
    uploader: RwLock<Option<Arc<dyn Uploader>>>,
}

impl StorageClient {
    pub fn new(
        signer: Option<Arc<dyn WalletSigner>>,
        factory: Arc<dyn UploaderFactory>,
        required_chain_id: u64,
        symbol: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            signer,
            factory,
            required_chain_id,
            symbol: symbol.into(),
            decimals,
            init: Mutex::new(()),
            uploader: RwLock::new(None),
        }
    }

    /// Display symbol of the funding token.
    pub fn token_symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// The session uploader, building it on first use.
    pub async fn acquire(&self) -> Result<Arc<dyn Uploader>, JournalError> {
        if let Some(uploader) = self.current().await {
            return Ok(uploader);
        }

        let _init = self.init.lock().await;
        if let Some(uploader) = self.current().await {
            return Ok(uploader);
        }

        let signer = self
            .signer
            .clone()
            .ok_or_else(|| JournalError::Connection("No wallet provider is available".to_string()))?;

        let actual = signer
            .current_network()
            .await
            .map_err(|e| JournalError::Connection(e.to_string()))?;
        if actual != self.required_chain_id {
            return Err(JournalError::ChainMismatch {
                required: self.required_chain_id,
                actual,
            });
        }

        let uploader = self
            .factory
            .build(signer)
            .map_err(|e| JournalError::Connection(e.to_string()))?;
        uploader
            .ready()
            .await
            .map_err(|e| JournalError::Connection(e.to_string()))?;

        tracing::info!(
            address = %uploader.address(),
            token = %uploader.token(),
            "Storage uploader ready"
        );
        *self.uploader.write().await = Some(uploader.clone());
        Ok(uploader)
    }

    /// Drop the session uploader; the next `acquire()` builds a new one.
    pub async fn reset(&self) {
        let _init = self.init.lock().await;
        self.uploader.write().await.take();
    }

    async fn current(&self) -> Option<Arc<dyn Uploader>> {
        self.uploader.read().await.clone()
    }

    /// Prepaid balance as a decimal string, `"0"` when it cannot be read.
    pub async fn get_balance(&self) -> String {
        let uploader = match self.acquire().await {
            Ok(uploader) => uploader,
            Err(e) => {
                tracing::warn!(error = %e, "Balance unavailable, reporting zero");
                return "0".to_string();
            }
        };

        match uploader.loaded_balance().await {
            Ok(atomic) => from_atomic(atomic, uploader.decimals()),
            Err(e) => {
                tracing::warn!(error = %e, "Balance query failed, reporting zero");
                "0".to_string()
            }
        }
    }

    /// Submit a funding transfer of `amount` whole tokens.
    ///
    /// Settlement is asynchronous; poll [`Self::get_balance`] to observe it.
    pub async fn fund(&self, amount: &str) -> Result<FundTx, JournalError> {
        let atomic = to_atomic(amount, self.decimals)
            .map_err(|e| JournalError::InvalidAmount(e.to_string()))?;
        if atomic.is_zero() {
            return Err(JournalError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }

        let uploader = self.acquire().await?;
        let tx = uploader
            .fund(atomic)
            .await
            .map_err(|e| JournalError::Funding(e.to_string()))?;

        tracing::info!(tx_id = %tx.id, amount = %amount, token = %self.symbol, "Funding submitted");
        Ok(tx)
    }

    /// Store `text` permanently with `tags`. Never retried.
    pub async fn upload(&self, text: &str, tags: &[Tag]) -> Result<Receipt, JournalError> {
        let uploader = self.acquire().await?;

        let balance = uploader.loaded_balance().await.map_err(|e| {
            tracing::error!(error = %e, "Balance query failed before upload");
            JournalError::BalanceUnavailable(e.to_string())
        })?;
        let minimum = min_upload_balance(uploader.decimals());
        if balance < minimum {
            return Err(JournalError::InsufficientBalance {
                balance: from_atomic(balance, uploader.decimals()),
                required: MIN_UPLOAD_BALANCE.to_string(),
                token: self.symbol.clone(),
            });
        }

        uploader
            .upload(text.as_bytes(), tags)
            .await
            .map_err(|e| JournalError::Upload(e.to_string()))
    }

    /// Check a receipt's proof with the session uploader, or directly when
    /// no uploader is ready yet.
    pub async fn verify_receipt(&self, receipt: &Receipt) -> Result<bool, UploaderError> {
        match self.current().await {
            Some(uploader) => uploader.verify_receipt(receipt).await,
            None => verify_receipt_signature(receipt),
        }
    }
}

/// `MIN_UPLOAD_BALANCE` in atomic units (10^decimals / 10^4).
fn min_upload_balance(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals)) / U256::from(10_000u64)
}
