// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Local Storage
//!
//! - [`LocalCache`]: redb-backed record of this client's uploads and their
//!   receipts. Survives restarts and is the fallback when the remote index
//!   is unreachable.
//! - [`ContentCache`]: in-memory LRU of gateway content.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   local-store.redb   # table `local_store`: haiku-receipts, haiku-cache
//! ```

pub mod content_cache;
pub mod local_cache;

pub use content_cache::ContentCache;
pub use local_cache::{CacheError, CacheResult, LocalCache};

/// File name of the redb store inside the data directory.
pub const LOCAL_STORE_FILE: &str = "local-store.redb";
