// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Locally-held wallet backed by an EVM JSON-RPC node.

use std::str::FromStr;

use alloy::{
    network::EthereumWallet,
    primitives::{Address, Signature, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::{local::PrivateKeySigner, Signer},
};
use async_trait::async_trait;

use super::types::NetworkConfig;
use crate::wallet::{ProviderError, WalletProvider, WalletSigner};

/// Wallet holding a single private key.
///
/// The key is always "authorized", so account requests never prompt. The
/// active chain is whatever the configured RPC node reports; switching is
/// only possible when it already matches.
pub struct LocalWallet {
    network: NetworkConfig,
    signer: PrivateKeySigner,
    provider: DynProvider,
}

impl LocalWallet {
    /// Create a wallet that signs with `signer` and talks to the network's RPC.
    pub fn new(network: NetworkConfig, signer: PrivateKeySigner) -> Result<Self, ProviderError> {
        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| ProviderError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(url)
            .erased();

        Ok(Self {
            network,
            signer,
            provider,
        })
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    fn checksummed(&self) -> String {
        self.signer.address().to_checksum(None)
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        Ok(vec![self.checksummed()])
    }

    async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        Ok(vec![self.checksummed()])
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        let current = self.current_network().await?;
        if current == chain_id {
            Ok(())
        } else {
            Err(ProviderError::Unsupported(format!(
                "RPC node is on chain {current}; cannot switch to {chain_id}"
            )))
        }
    }

    async fn current_network(&self) -> Result<u64, ProviderError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))
    }
}

#[async_trait]
impl WalletSigner for LocalWallet {
    fn address(&self) -> String {
        self.checksummed()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, ProviderError> {
        self.signer
            .sign_message(message)
            .await
            .map_err(|e| ProviderError::Signing(e.to_string()))
    }

    async fn send_value(&self, to: &str, value: U256) -> Result<String, ProviderError> {
        let to_addr =
            Address::from_str(to).map_err(|e| ProviderError::InvalidAddress(e.to_string()))?;

        let tx = TransactionRequest::default()
            .from(self.signer.address())
            .to(to_addr)
            .value(value);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ProviderError::Rpc(format!("Failed to send: {e}")))?;

        let tx_hash = format!("{:#x}", pending.tx_hash());
        tracing::info!(tx_hash = %tx_hash, to = %to_addr, value = %value, "Native transfer sent");
        Ok(tx_hash)
    }
}
