// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permanent storage uploads.
//!
//! [`StorageClient`] owns the one [`Uploader`] of a session. The production
//! uploader is [`BundlerClient`], which signs ANS-104 data items with the
//! wallet and posts them to an Irys bundler node.

pub mod bundler;
pub mod client;
pub mod data_item;
pub mod deep_hash;
pub mod receipt;

use std::sync::Arc;

use alloy::primitives::U256;
use async_trait::async_trait;

use crate::models::{FundTx, Receipt, Tag};
use crate::wallet::{ProviderError, WalletSigner};

pub use bundler::{BundlerClient, BundlerFactory};
pub use client::{StorageClient, MIN_UPLOAD_BALANCE};

/// Errors raised by an uploader.
#[derive(Debug, thiserror::Error)]
pub enum UploaderError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Bundler returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid bundler response: {0}")]
    InvalidResponse(String),

    #[error("Wallet error: {0}")]
    Wallet(#[from] ProviderError),

    #[error("Uploader is not ready")]
    NotReady,

    #[error("Unsupported receipt: {0}")]
    UnsupportedReceipt(String),

    #[error("Bundler has no deposit address for {0}")]
    NoDepositAddress(String),
}

/// A storage network session bound to one wallet.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Address that signs and pays for uploads.
    fn address(&self) -> &str;

    /// Bundler currency identifier.
    fn token(&self) -> &str;

    fn decimals(&self) -> u8;

    /// Resolve the wallet's signing key. Must succeed before uploading.
    async fn ready(&self) -> Result<(), UploaderError>;

    /// Prepaid balance in atomic units.
    async fn loaded_balance(&self) -> Result<U256, UploaderError>;

    /// Transfer `amount` atomic units to the bundler.
    async fn fund(&self, amount: U256) -> Result<FundTx, UploaderError>;

    /// Store `data` permanently with `tags`.
    async fn upload(&self, data: &[u8], tags: &[Tag]) -> Result<Receipt, UploaderError>;

    /// Check the bundler's signature on a receipt.
    async fn verify_receipt(&self, receipt: &Receipt) -> Result<bool, UploaderError>;
}

/// Builds an uploader for a wallet.
pub trait UploaderFactory: Send + Sync {
    fn build(&self, signer: Arc<dyn WalletSigner>) -> Result<Arc<dyn Uploader>, UploaderError>;
}
