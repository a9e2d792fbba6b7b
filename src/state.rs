// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::journal::Journal;

#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<Journal>,
    /// Cancelled on server shutdown; ends long-running waits.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(journal: Arc<Journal>, shutdown: CancellationToken) -> Self {
        Self { journal, shutdown }
    }
}
