// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for an Irys bundler node.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::data_item::{sign_data_item, OWNER_LENGTH};
use super::receipt::verify_receipt_signature;
use super::{Uploader, UploaderError, UploaderFactory};
use crate::blockchain::NetworkConfig;
use crate::models::{FundTx, Receipt, Tag};
use crate::wallet::WalletSigner;

/// Message the wallet signs so its public key can be recovered.
pub const CONNECT_MESSAGE: &str = "sign this message to connect to Bundlr.Network";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: AtomicAmount,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AtomicAmount {
    Text(String),
    Number(u64),
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    #[serde(default)]
    addresses: HashMap<String, String>,
}

/// Uploader talking to a bundler node over HTTP.
pub struct BundlerClient {
    http: Client,
    bundler_url: String,
    token: String,
    decimals: u8,
    signer: Arc<dyn WalletSigner>,
    address: String,
    owner: OnceLock<[u8; OWNER_LENGTH]>,
}

impl BundlerClient {
    pub fn new(
        http: Client,
        bundler_url: &str,
        token: &str,
        decimals: u8,
        signer: Arc<dyn WalletSigner>,
    ) -> Self {
        let address = signer.address();
        Self {
            http,
            bundler_url: bundler_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            decimals,
            signer,
            address,
            owner: OnceLock::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.bundler_url, path)
    }

    async fn deposit_address(&self) -> Result<String, UploaderError> {
        let response = self
            .http
            .get(self.url("/info"))
            .send()
            .await
            .map_err(|e| UploaderError::Http(format!("GET /info failed: {e}")))?;
        let info: InfoResponse = read_json(response).await?;

        info.addresses
            .get(&self.token)
            .cloned()
            .ok_or_else(|| UploaderError::NoDepositAddress(self.token.clone()))
    }

    async fn notify_funding(&self, tx_hash: &str) {
        let result = self
            .http
            .post(self.url(&format!("/account/balance/{}", self.token)))
            .json(&json!({ "tx_id": tx_hash }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(tx_hash = %tx_hash, "Bundler notified of funding");
            }
            Ok(response) => {
                tracing::warn!(
                    tx_hash = %tx_hash,
                    status = %response.status(),
                    "Bundler rejected funding notification; it will pick the transfer up on its own"
                );
            }
            Err(e) => {
                tracing::warn!(tx_hash = %tx_hash, error = %e, "Funding notification failed");
            }
        }
    }
}

#[async_trait]
impl Uploader for BundlerClient {
    fn address(&self) -> &str {
        &self.address
    }

    fn token(&self) -> &str {
        &self.token
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    async fn ready(&self) -> Result<(), UploaderError> {
        if self.owner.get().is_some() {
            return Ok(());
        }

        let signature = self.signer.sign_message(CONNECT_MESSAGE.as_bytes()).await?;
        let key = signature
            .recover_from_msg(CONNECT_MESSAGE)
            .map_err(|e| UploaderError::InvalidResponse(format!("cannot recover wallet key: {e}")))?;

        let recovered = Address::from_public_key(&key).to_checksum(None);
        if !recovered.eq_ignore_ascii_case(&self.address) {
            return Err(UploaderError::InvalidResponse(format!(
                "wallet signed as {recovered}, expected {}",
                self.address
            )));
        }

        let mut owner = [0u8; OWNER_LENGTH];
        owner.copy_from_slice(key.to_encoded_point(false).as_bytes());
        let _ = self.owner.set(owner);
        Ok(())
    }

    async fn loaded_balance(&self) -> Result<U256, UploaderError> {
        let path = format!("/account/balance/{}", self.token);
        let response = self
            .http
            .get(self.url(&path))
            .query(&[("address", self.address.as_str())])
            .send()
            .await
            .map_err(|e| UploaderError::Http(format!("GET {path} failed: {e}")))?;
        let body: BalanceResponse = read_json(response).await?;

        match body.balance {
            AtomicAmount::Number(n) => Ok(U256::from(n)),
            AtomicAmount::Text(s) => s
                .trim()
                .parse::<U256>()
                .map_err(|e| UploaderError::InvalidResponse(format!("balance {s:?}: {e}"))),
        }
    }

    async fn fund(&self, amount: U256) -> Result<FundTx, UploaderError> {
        let target = self.deposit_address().await?;
        let tx_hash = self.signer.send_value(&target, amount).await?;
        self.notify_funding(&tx_hash).await;

        Ok(FundTx {
            id: tx_hash,
            quantity: amount.to_string(),
            target,
        })
    }

    async fn upload(&self, data: &[u8], tags: &[Tag]) -> Result<Receipt, UploaderError> {
        let owner = self.owner.get().ok_or(UploaderError::NotReady)?;
        let item = sign_data_item(self.signer.as_ref(), owner, tags, data).await?;

        let path = format!("/tx/{}", self.token);
        let response = self
            .http
            .post(self.url(&path))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(item.bytes)
            .send()
            .await
            .map_err(|e| UploaderError::Http(format!("POST {path} failed: {e}")))?;
        let receipt: Receipt = read_json(response).await?;

        if receipt.id != item.id {
            tracing::warn!(expected = %item.id, actual = %receipt.id, "Bundler receipt id differs from data item id");
        }
        tracing::info!(content_id = %receipt.id, bytes = data.len(), "Upload accepted");
        Ok(receipt)
    }

    async fn verify_receipt(&self, receipt: &Receipt) -> Result<bool, UploaderError> {
        verify_receipt_signature(receipt)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, UploaderError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(UploaderError::Status { status, body });
    }

    response
        .json()
        .await
        .map_err(|e| UploaderError::InvalidResponse(e.to_string()))
}

/// Builds [`BundlerClient`]s for one network, sharing an HTTP client.
pub struct BundlerFactory {
    http: Client,
    bundler_url: String,
    token: &'static str,
    decimals: u8,
}

impl BundlerFactory {
    pub fn new(network: &NetworkConfig) -> Result<Self, UploaderError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UploaderError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            bundler_url: network.bundler_url.clone(),
            token: network.token,
            decimals: network.decimals,
        })
    }
}

impl UploaderFactory for BundlerFactory {
    fn build(&self, signer: Arc<dyn WalletSigner>) -> Result<Arc<dyn Uploader>, UploaderError> {
        Ok(Arc::new(BundlerClient::new(
            self.http.clone(),
            &self.bundler_url,
            self.token,
            self.decimals,
            signer,
        )))
    }
}
