// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Settlement Watcher
//!
//! Funding transfers settle on the bundler some time after they are sent.
//! The watcher polls the balance until it rises above a baseline or the
//! deadline passes.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken`, so a server shutdown ends any
//! in-flight wait immediately.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::blockchain::to_atomic;
use crate::journal::Journal;

/// Matches the settle delay the bundler usually needs.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// How a wait ended. Each variant carries the last balance seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Settled(String),
    TimedOut(String),
    Cancelled(String),
}

impl Settlement {
    pub fn balance(&self) -> &str {
        match self {
            Settlement::Settled(b) | Settlement::TimedOut(b) | Settlement::Cancelled(b) => b,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Settlement::Settled(_))
    }
}

pub struct SettlementWatcher {
    journal: Arc<Journal>,
    poll_interval: Duration,
    timeout: Duration,
}

impl SettlementWatcher {
    pub fn new(journal: Arc<Journal>) -> Self {
        Self::with_timing(journal, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT)
    }

    pub fn with_timing(journal: Arc<Journal>, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            journal,
            poll_interval,
            timeout,
        }
    }

    /// Poll until the balance exceeds `baseline` (a decimal string).
    pub async fn wait(&self, baseline: &str, shutdown: CancellationToken) -> Settlement {
        let decimals = self.journal.storage().decimals();
        let baseline_atomic = to_atomic(baseline, decimals).unwrap_or_default();
        let deadline = Instant::now() + self.timeout;

        loop {
            let balance = self.journal.get_balance().await;
            let current = to_atomic(&balance, decimals).unwrap_or_default();
            if current > baseline_atomic {
                info!(baseline = %baseline, balance = %balance, "Funding settled");
                return Settlement::Settled(balance);
            }

            if Instant::now() >= deadline {
                info!(baseline = %baseline, "Funding not settled before deadline");
                return Settlement::TimedOut(balance);
            }
            debug!(balance = %balance, "Waiting for funding to settle");

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {},
                _ = shutdown.cancelled() => {
                    return Settlement::Cancelled(balance);
                }
            }
        }
    }
}
