// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet connection state.

use std::sync::Arc;

use super::WalletProvider;
use crate::error::JournalError;
use crate::models::WalletState;

/// Connection to the host wallet, pinned to one required chain.
///
/// Owns [`WalletState`] exclusively. Disconnecting only forgets in-memory
/// state; nothing happens on chain.
pub struct WalletSession {
    provider: Option<Arc<dyn WalletProvider>>,
    required_chain_id: u64,
    state: WalletState,
}

impl WalletSession {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, required_chain_id: u64) -> Self {
        Self {
            provider,
            required_chain_id,
            state: WalletState::default(),
        }
    }

    pub fn state(&self) -> &WalletState {
        &self.state
    }

    pub fn address(&self) -> Option<&str> {
        self.state.address.as_deref()
    }

    pub fn required_chain_id(&self) -> u64 {
        self.required_chain_id
    }

    /// Request account access, try to switch to the required chain, and
    /// confirm the wallet ended up there.
    ///
    /// Returns the primary address.
    pub async fn connect(&mut self) -> Result<String, JournalError> {
        let provider = self.provider()?;

        let accounts = provider
            .request_accounts()
            .await
            .map_err(|e| JournalError::Connection(e.to_string()))?;
        let address = primary_account(accounts)?;

        self.ensure_chain(provider.as_ref()).await?;

        tracing::info!(address = %address, chain_id = self.required_chain_id, "Wallet connected");
        self.state = WalletState {
            is_connected: true,
            address: Some(address.clone()),
            balance: "0".to_string(),
        };
        Ok(address)
    }

    /// Reconnect silently when the wallet already authorized an account.
    ///
    /// Returns `Ok(None)` and stays disconnected when nothing is authorized.
    pub async fn restore(&mut self) -> Result<Option<String>, JournalError> {
        let Some(provider) = self.provider.clone() else {
            return Ok(None);
        };

        let authorized = provider
            .accounts()
            .await
            .map_err(|e| JournalError::Connection(e.to_string()))?;
        if authorized.iter().all(|a| a.is_empty()) {
            return Ok(None);
        }

        self.connect().await.map(Some)
    }

    pub fn disconnect(&mut self) {
        if let Some(address) = self.state.address.as_deref() {
            tracing::info!(address = %address, "Wallet disconnected");
        }
        self.state = WalletState::default();
    }

    /// Record the latest bundler balance (ignored while disconnected).
    pub fn set_balance(&mut self, balance: String) {
        if self.state.is_connected {
            self.state.balance = balance;
        }
    }

    fn provider(&self) -> Result<Arc<dyn WalletProvider>, JournalError> {
        self.provider
            .clone()
            .ok_or_else(|| JournalError::Connection("No wallet provider is available".to_string()))
    }

    async fn ensure_chain(&self, provider: &dyn WalletProvider) -> Result<(), JournalError> {
        if let Err(e) = provider.switch_chain(self.required_chain_id).await {
            // The wallet may already be on the right chain, or the user declined.
            tracing::debug!(
                chain_id = self.required_chain_id,
                error = %e,
                "Chain switch not performed"
            );
        }

        let actual = provider
            .current_network()
            .await
            .map_err(|e| JournalError::Connection(e.to_string()))?;

        if actual != self.required_chain_id {
            return Err(JournalError::ChainMismatch {
                required: self.required_chain_id,
                actual,
            });
        }
        Ok(())
    }
}

fn primary_account(accounts: Vec<String>) -> Result<String, JournalError> {
    accounts
        .into_iter()
        .find(|a| !a.trim().is_empty())
        .ok_or_else(|| JournalError::Connection("Wallet returned no accounts".to_string()))
}
