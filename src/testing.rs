// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test doubles. Journals built here point at unreachable remote endpoints.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Signature, U256};
use alloy::signers::{local::PrivateKeySigner, Signer, SignerSync};
use async_trait::async_trait;
use base64ct::{Base64UrlUnpadded, Encoding};

use crate::blockchain::signing::signer_from_hex;
use crate::blockchain::to_atomic;
use crate::gateway::Gateway;
use crate::indexer::RemoteIndex;
use crate::journal::Journal;
use crate::models::{FundTx, Receipt, Tag, APP_NAME};
use crate::storage::LocalCache;
use crate::uploader::data_item::item_id;
use crate::uploader::receipt::{receipt_message, verify_receipt_signature};
use crate::uploader::{StorageClient, Uploader, UploaderError, UploaderFactory};
use crate::wallet::{ProviderError, WalletProvider, WalletSession, WalletSigner};

const WALLET_KEY: &str = "0x0101010101010101010101010101010101010101010101010101010101010101";

/// Endpoint nothing listens on.
pub(crate) const UNREACHABLE: &str = "http://127.0.0.1:9";

// =============================================================================
// Wallet
// =============================================================================

pub(crate) struct SimulatedWallet {
    signer: PrivateKeySigner,
    chain_id: AtomicU64,
    can_switch: bool,
    rejects: bool,
    sent: Mutex<Vec<(String, U256)>>,
}

impl SimulatedWallet {
    pub(crate) fn on_chain(chain_id: u64) -> Self {
        Self {
            signer: signer_from_hex(WALLET_KEY).expect("valid test key"),
            chain_id: AtomicU64::new(chain_id),
            can_switch: false,
            rejects: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A wallet whose user declines every access request.
    pub(crate) fn rejecting() -> Self {
        Self {
            rejects: true,
            ..Self::on_chain(1270)
        }
    }

    pub(crate) fn allow_switch(mut self) -> Self {
        self.can_switch = true;
        self
    }

    pub(crate) fn owner_key(&self) -> [u8; 65] {
        let point = self.signer.credential().verifying_key().to_encoded_point(false);
        let mut owner = [0u8; 65];
        owner.copy_from_slice(point.as_bytes());
        owner
    }

    pub(crate) fn sent(&self) -> Vec<(String, U256)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletProvider for SimulatedWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        if self.rejects {
            return Err(ProviderError::Rejected);
        }
        Ok(vec![self.address()])
    }

    async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        if self.rejects {
            return Ok(Vec::new());
        }
        Ok(vec![self.address()])
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        if !self.can_switch {
            return Err(ProviderError::Rejected);
        }
        self.chain_id.store(chain_id, Ordering::SeqCst);
        Ok(())
    }

    async fn current_network(&self) -> Result<u64, ProviderError> {
        Ok(self.chain_id.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl WalletSigner for SimulatedWallet {
    fn address(&self) -> String {
        self.signer.address().to_checksum(None)
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, ProviderError> {
        Signer::sign_message(&self.signer, message)
            .await
            .map_err(|e| ProviderError::Signing(e.to_string()))
    }

    async fn send_value(&self, to: &str, value: U256) -> Result<String, ProviderError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((to.to_string(), value));
        Ok(format!("0xsent{}", sent.len() - 1))
    }
}

// =============================================================================
// Receipts
// =============================================================================

/// Sign `receipt` as a bundler holding `signer` would.
pub(crate) fn sign_receipt(signer: &PrivateKeySigner, mut receipt: Receipt) -> Receipt {
    let public = signer.credential().verifying_key().to_encoded_point(false);
    receipt.public = Some(Base64UrlUnpadded::encode_string(public.as_bytes()));

    let message = receipt_message(&receipt).expect("receipt has a deadline height");
    let signature = signer.sign_message_sync(&message).expect("signing succeeds");
    receipt.signature = Base64UrlUnpadded::encode_string(&signature.as_bytes());
    receipt
}

// =============================================================================
// Uploader
// =============================================================================

/// Shared state behind every uploader a factory builds.
pub(crate) struct UploaderControls {
    /// (settled balance, pending funding)
    balance: Mutex<(U256, U256)>,
    fail_balance: AtomicBool,
    fail_uploads: AtomicBool,
    stall_ready: AtomicBool,
    upload_attempts: AtomicUsize,
    uploads: AtomicUsize,
    last_tags: Mutex<Vec<Tag>>,
    bundler: PrivateKeySigner,
}

impl UploaderControls {
    pub(crate) fn fail_balance(&self, fail: bool) {
        self.fail_balance.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub(crate) fn upload_attempts(&self) -> usize {
        self.upload_attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn last_tags(&self) -> Vec<Tag> {
        self.last_tags.lock().unwrap().clone()
    }
}

/// Uploader keeping everything in memory.
///
/// Funding settles one balance read after it is submitted, so callers see
/// the same delay they would against a real bundler.
pub(crate) struct InMemoryUploader {
    address: String,
    controls: Arc<UploaderControls>,
}

#[async_trait]
impl Uploader for InMemoryUploader {
    fn address(&self) -> &str {
        &self.address
    }

    fn token(&self) -> &str {
        "irys"
    }

    fn decimals(&self) -> u8 {
        18
    }

    async fn ready(&self) -> Result<(), UploaderError> {
        if self.controls.stall_ready.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        // Long enough for racing acquire() calls to pile up.
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(())
    }

    async fn loaded_balance(&self) -> Result<U256, UploaderError> {
        if self.controls.fail_balance.load(Ordering::SeqCst) {
            return Err(UploaderError::Http("simulated balance outage".to_string()));
        }
        let mut balance = self.controls.balance.lock().unwrap();
        let (settled, pending) = *balance;
        *balance = (settled + pending, U256::ZERO);
        Ok(settled)
    }

    async fn fund(&self, amount: U256) -> Result<FundTx, UploaderError> {
        self.controls.balance.lock().unwrap().1 += amount;
        Ok(FundTx {
            id: format!("0xfund{}", uuid::Uuid::new_v4().simple()),
            quantity: amount.to_string(),
            target: "0x00000000000000000000000000000000000000aa".to_string(),
        })
    }

    async fn upload(&self, data: &[u8], tags: &[Tag]) -> Result<Receipt, UploaderError> {
        self.controls.upload_attempts.fetch_add(1, Ordering::SeqCst);
        if self.controls.fail_uploads.load(Ordering::SeqCst) {
            return Err(UploaderError::Http("simulated upload outage".to_string()));
        }
        self.controls.uploads.fetch_add(1, Ordering::SeqCst);
        *self.controls.last_tags.lock().unwrap() = tags.to_vec();

        let mut seed = data.to_vec();
        seed.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
        let receipt = Receipt {
            id: item_id(&seed),
            timestamp: chrono::Utc::now().timestamp_millis() as u64,
            protocol_version: "1.0.0".to_string(),
            signature: String::new(),
            public: None,
            deadline_height: Some(1_000_000),
        };
        Ok(sign_receipt(&self.controls.bundler, receipt))
    }

    async fn verify_receipt(&self, receipt: &Receipt) -> Result<bool, UploaderError> {
        verify_receipt_signature(receipt)
    }
}

pub(crate) struct InMemoryUploaderFactory {
    controls: Arc<UploaderControls>,
    builds: AtomicUsize,
    failing_builds: AtomicUsize,
}

impl InMemoryUploaderFactory {
    /// Start with `balance` whole tokens already settled.
    pub(crate) fn with_balance(balance: &str) -> Self {
        let settled = to_atomic(balance, 18).expect("valid test balance");
        Self {
            controls: Arc::new(UploaderControls {
                balance: Mutex::new((settled, U256::ZERO)),
                fail_balance: AtomicBool::new(false),
                fail_uploads: AtomicBool::new(false),
                stall_ready: AtomicBool::new(false),
                upload_attempts: AtomicUsize::new(0),
                uploads: AtomicUsize::new(0),
                last_tags: Mutex::new(Vec::new()),
                bundler: PrivateKeySigner::random(),
            }),
            builds: AtomicUsize::new(0),
            failing_builds: AtomicUsize::new(0),
        }
    }

    /// Make the next `n` builds fail.
    pub(crate) fn failing_builds(self, n: usize) -> Self {
        self.failing_builds.store(n, Ordering::SeqCst);
        self
    }

    /// Every uploader this factory builds never becomes ready.
    pub(crate) fn stalled_ready(self) -> Self {
        self.controls.stall_ready.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub(crate) fn uploader(&self) -> &UploaderControls {
        &self.controls
    }
}

impl UploaderFactory for InMemoryUploaderFactory {
    fn build(&self, signer: Arc<dyn WalletSigner>) -> Result<Arc<dyn Uploader>, UploaderError> {
        self.builds.fetch_add(1, Ordering::SeqCst);

        let failing = self.failing_builds.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_builds.store(failing - 1, Ordering::SeqCst);
            return Err(UploaderError::Http("simulated build failure".to_string()));
        }

        Ok(Arc::new(InMemoryUploader {
            address: signer.address(),
            controls: self.controls.clone(),
        }))
    }
}

// =============================================================================
// Journal
// =============================================================================

/// A journal on chain 1270 whose index and gateway are unreachable.
pub(crate) fn test_journal(
    wallet: Option<SimulatedWallet>,
    factory: Arc<InMemoryUploaderFactory>,
) -> (Journal, tempfile::TempDir) {
    let wallet = wallet.map(Arc::new);
    let provider = wallet.clone().map(|w| w as Arc<dyn WalletProvider>);
    let signer = wallet.map(|w| w as Arc<dyn WalletSigner>);

    let dir = tempfile::tempdir().expect("tempdir");
    let cache = Arc::new(LocalCache::open(&dir.path().join("local-store.redb")).expect("cache"));
    let gateway = Arc::new(Gateway::new(UNREACHABLE).expect("gateway"));
    let index = RemoteIndex::new(
        &format!("{UNREACHABLE}/graphql"),
        APP_NAME,
        reqwest::Client::new(),
        gateway.clone(),
        cache.clone(),
    );
    let storage = Arc::new(StorageClient::new(signer, factory, 1270, "IRYS", 18));

    let journal = Journal::new(
        WalletSession::new(provider, 1270),
        storage,
        cache,
        index,
        gateway,
    );
    (journal, dir)
}
