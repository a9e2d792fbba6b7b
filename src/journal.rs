// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The journal facade: one object wiring wallet, storage, cache, index and
//! verification together. This is the surface the HTTP API calls.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::JournalError;
use crate::gateway::Gateway;
use crate::indexer::RemoteIndex;
use crate::models::{haiku_tags, FundTx, Receipt, UploadRecord, Verification, WalletState};
use crate::storage::LocalCache;
use crate::uploader::StorageClient;
use crate::verify::ReceiptVerifier;
use crate::wallet::WalletSession;

pub struct Journal {
    session: RwLock<WalletSession>,
    storage: Arc<StorageClient>,
    cache: Arc<LocalCache>,
    index: RemoteIndex,
    verifier: ReceiptVerifier,
    gateway: Arc<Gateway>,
}

impl Journal {
    pub fn new(
        session: WalletSession,
        storage: Arc<StorageClient>,
        cache: Arc<LocalCache>,
        index: RemoteIndex,
        gateway: Arc<Gateway>,
    ) -> Self {
        let verifier = ReceiptVerifier::new(cache.clone(), storage.clone(), gateway.clone());
        Self {
            session: RwLock::new(session),
            storage,
            cache,
            index,
            verifier,
            gateway,
        }
    }

    pub fn storage(&self) -> &Arc<StorageClient> {
        &self.storage
    }

    pub fn cache(&self) -> &Arc<LocalCache> {
        &self.cache
    }

    // =========================================================================
    // Wallet
    // =========================================================================

    pub async fn connect(&self) -> Result<WalletState, JournalError> {
        self.session.write().await.connect().await?;
        self.refresh_balance().await;
        Ok(self.wallet_state().await)
    }

    /// Reconnect an already-authorized wallet at start-up.
    pub async fn restore(&self) -> Result<Option<WalletState>, JournalError> {
        let restored = self.session.write().await.restore().await?;
        if restored.is_none() {
            return Ok(None);
        }
        self.refresh_balance().await;
        Ok(Some(self.wallet_state().await))
    }

    pub async fn disconnect(&self) {
        self.session.write().await.disconnect();
        self.storage.reset().await;
    }

    pub async fn wallet_state(&self) -> WalletState {
        self.session.read().await.state().clone()
    }

    // =========================================================================
    // Balance and funding
    // =========================================================================

    /// Current prepaid balance, `"0"` when unknown.
    pub async fn get_balance(&self) -> String {
        if !self.is_connected().await {
            return "0".to_string();
        }
        self.refresh_balance().await
    }

    /// Submit a funding transfer. The new balance shows up after settlement.
    pub async fn fund(&self, amount: &str) -> Result<FundTx, JournalError> {
        self.require_connected().await?;
        let tx = self.storage.fund(amount).await?;
        self.refresh_balance().await;
        Ok(tx)
    }

    // =========================================================================
    // Haiku
    // =========================================================================

    /// Store a haiku permanently and remember it locally.
    ///
    /// The author tag is always the signing wallet's address; a different
    /// `claimed_author` is ignored.
    pub async fn upload(
        &self,
        text: &str,
        topic: &str,
        claimed_author: Option<&str>,
    ) -> Result<Receipt, JournalError> {
        if text.trim().is_empty() {
            return Err(JournalError::InvalidInput("text must not be empty".to_string()));
        }
        if topic.trim().is_empty() {
            return Err(JournalError::InvalidInput("topic must not be empty".to_string()));
        }
        self.require_connected().await?;

        let uploader = self.storage.acquire().await?;
        let author = uploader.address().to_string();
        if let Some(claimed) = claimed_author {
            if !claimed.eq_ignore_ascii_case(&author) {
                tracing::warn!(claimed = %claimed, signer = %author, "Ignoring claimed author");
            }
        }

        let created_at = chrono::Utc::now().timestamp_millis();
        let tags = haiku_tags(&author, topic, created_at);
        let receipt = self.storage.upload(text, &tags).await?;

        let record = UploadRecord {
            content_id: receipt.id.clone(),
            text: text.to_string(),
            topic: topic.to_string(),
            created_at,
            author_address: author,
        };
        if let Err(e) = self.cache.save(&record, &receipt) {
            // Content is already permanent; the index will still surface it.
            tracing::error!(content_id = %receipt.id, error = %e, "Failed to cache upload");
        }

        self.refresh_balance().await;
        Ok(receipt)
    }

    pub async fn list_for_author(&self, address: &str) -> Vec<UploadRecord> {
        self.index.list_for_author(address).await
    }

    pub async fn verify(&self, content_id: &str) -> bool {
        self.verifier.verify(content_id).await
    }

    pub async fn check(&self, content_id: &str) -> Verification {
        self.verifier.check(content_id).await
    }

    pub fn gateway_url(&self, content_id: &str) -> String {
        self.gateway.url_for(content_id)
    }

    pub fn token_symbol(&self) -> &str {
        self.storage.token_symbol()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn is_connected(&self) -> bool {
        self.session.read().await.state().is_connected
    }

    async fn require_connected(&self) -> Result<(), JournalError> {
        if self.is_connected().await {
            Ok(())
        } else {
            Err(JournalError::Connection("Wallet is not connected".to_string()))
        }
    }

    async fn refresh_balance(&self) -> String {
        let balance = self.storage.get_balance().await;
        self.session.write().await.set_balance(balance.clone());
        balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_journal, InMemoryUploaderFactory, SimulatedWallet};

    const AUTUMN: &str = "autumn leaves fall\nsilent across the cold stone\nwinter holds its breath";

    #[tokio::test]
    async fn connect_reports_address_and_balance() {
        let factory = Arc::new(InMemoryUploaderFactory::with_balance("1.25"));
        let (journal, _dir) = test_journal(Some(SimulatedWallet::on_chain(1270)), factory);

        let state = journal.connect().await.unwrap();

        assert!(state.is_connected);
        assert!(state.address.is_some());
        assert_eq!(state.balance, "1.25");
    }

    #[tokio::test]
    async fn upload_then_verify_round_trip() {
        let factory = Arc::new(InMemoryUploaderFactory::with_balance("1"));
        let (journal, _dir) = test_journal(Some(SimulatedWallet::on_chain(1270)), factory);
        let address = journal.connect().await.unwrap().address.unwrap();

        let receipt = journal.upload(AUTUMN, "autumn", None).await.unwrap();

        assert!(!receipt.id.is_empty());
        assert!(journal.verify(&receipt.id).await);

        let cached = journal.cache().list(&address.to_lowercase()).unwrap();
        assert_eq!(cached[0].content_id, receipt.id);
        assert_eq!(cached[0].topic, "autumn");
        assert_eq!(cached[0].author_address, address);
    }

    #[tokio::test]
    async fn upload_tags_signer_not_claimed_author() {
        let factory = Arc::new(InMemoryUploaderFactory::with_balance("1"));
        let (journal, _dir) = test_journal(Some(SimulatedWallet::on_chain(1270)), factory.clone());
        let address = journal.connect().await.unwrap().address.unwrap();

        journal
            .upload(AUTUMN, "autumn", Some("0x000000000000000000000000000000000000dEaD"))
            .await
            .unwrap();

        let tags = factory.uploader().last_tags();
        let user = tags.iter().find(|t| t.name == "user").unwrap();
        assert_eq!(user.value, address);
    }

    #[tokio::test]
    async fn upload_requires_connection_and_content() {
        let factory = Arc::new(InMemoryUploaderFactory::with_balance("1"));
        let (journal, _dir) = test_journal(Some(SimulatedWallet::on_chain(1270)), factory.clone());

        assert!(matches!(
            journal.upload(AUTUMN, "autumn", None).await,
            Err(JournalError::Connection(_))
        ));

        journal.connect().await.unwrap();
        assert!(matches!(
            journal.upload("   ", "autumn", None).await,
            Err(JournalError::InvalidInput(_))
        ));
        assert!(matches!(
            journal.upload(AUTUMN, "", None).await,
            Err(JournalError::InvalidInput(_))
        ));
        assert_eq!(factory.uploader().uploads(), 0);
    }

    #[tokio::test]
    async fn insufficient_balance_surfaces_and_caches_nothing() {
        let factory = Arc::new(InMemoryUploaderFactory::with_balance("0"));
        let (journal, _dir) = test_journal(Some(SimulatedWallet::on_chain(1270)), factory.clone());
        let address = journal.connect().await.unwrap().address.unwrap();

        assert!(matches!(
            journal.upload(AUTUMN, "autumn", None).await,
            Err(JournalError::InsufficientBalance { .. })
        ));
        assert_eq!(factory.uploader().uploads(), 0);
        assert!(journal.cache().list(&address).unwrap().is_empty());
    }

    #[tokio::test]
    async fn funded_balance_appears_after_settlement() {
        let factory = Arc::new(InMemoryUploaderFactory::with_balance("0"));
        let (journal, _dir) = test_journal(Some(SimulatedWallet::on_chain(1270)), factory.clone());
        journal.connect().await.unwrap();

        let tx = journal.fund("0.01").await.unwrap();
        assert_eq!(tx.quantity, "10000000000000000");

        // First read after funding still sees the old balance.
        assert_eq!(journal.wallet_state().await.balance, "0");
        assert_eq!(journal.get_balance().await, "0.01");
        assert_eq!(journal.wallet_state().await.balance, "0.01");
    }

    #[tokio::test]
    async fn list_falls_back_to_cache_when_index_unreachable() {
        let factory = Arc::new(InMemoryUploaderFactory::with_balance("1"));
        let (journal, _dir) = test_journal(Some(SimulatedWallet::on_chain(1270)), factory);
        let address = journal.connect().await.unwrap().address.unwrap();

        let receipt = journal.upload(AUTUMN, "autumn", None).await.unwrap();

        let listed = journal.list_for_author(&address.to_uppercase().replace("0X", "0x")).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content_id, receipt.id);
    }

    #[tokio::test]
    async fn disconnect_resets_state_and_uploader() {
        let factory = Arc::new(InMemoryUploaderFactory::with_balance("1"));
        let (journal, _dir) = test_journal(Some(SimulatedWallet::on_chain(1270)), factory.clone());
        journal.connect().await.unwrap();
        assert_eq!(factory.builds(), 1);

        journal.disconnect().await;
        assert_eq!(journal.wallet_state().await, WalletState::default());
        assert_eq!(journal.get_balance().await, "0");

        journal.connect().await.unwrap();
        assert_eq!(factory.builds(), 2);
    }

    #[tokio::test]
    async fn restore_without_wallet_is_noop() {
        let factory = Arc::new(InMemoryUploaderFactory::with_balance("1"));
        let (journal, _dir) = test_journal(None, factory);

        assert!(journal.restore().await.unwrap().is_none());
        assert!(!journal.verify("anything").await);
        assert_eq!(journal.token_symbol(), "IRYS");
        assert_eq!(journal.gateway_url("abc"), "http://127.0.0.1:9/abc");
    }
}
