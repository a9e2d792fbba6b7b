// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet capability interfaces and the connection session.
//!
//! The host owns the wallet. This crate consumes it through two narrow traits:
//!
//! - [`WalletProvider`] - account access and network identity, used by
//!   [`WalletSession`] to connect.
//! - [`WalletSigner`] - message signing and native transfers, used by the
//!   uploader to sign data items and fund the bundler.
//!
//! [`crate::blockchain::LocalWallet`] adapts a locally-held key to both.

pub mod session;

use alloy::primitives::{Signature, U256};
use async_trait::async_trait;

pub use session::WalletSession;

/// Errors surfaced by a wallet provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("User rejected the request")]
    Rejected,

    #[error("Unsupported request: {0}")]
    Unsupported(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Account access and network identity (`eth_requestAccounts`,
/// `eth_accounts`, chain switch, chain id).
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for account access. May prompt the user.
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Accounts already authorized, without prompting.
    async fn accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Ask the wallet to move to `chain_id`.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError>;

    /// Chain id of the wallet's active network.
    async fn current_network(&self) -> Result<u64, ProviderError>;
}

/// Signing capabilities the uploader needs from the wallet.
#[async_trait]
pub trait WalletSigner: WalletProvider {
    /// Address that signs messages and transactions.
    fn address(&self) -> String;

    /// EIP-191 `personal_sign` over `message`.
    async fn sign_message(&self, message: &[u8]) -> Result<Signature, ProviderError>;

    /// Send `value` atomic units of the native token to `to`.
    ///
    /// Returns the transaction hash as soon as the node accepts it.
    async fn send_value(&self, to: &str, value: U256) -> Result<String, ProviderError>;
}
