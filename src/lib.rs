// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Haiku Journal - Permanent Storage Client
//!
//! Wallet-funded uploads of short texts to the Irys network, backed by a
//! local mirror of uploads and their receipts.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - Network selection, local EVM wallet, unit conversion
//! - `wallet` - Wallet provider seam and connection session
//! - `uploader` - Bundler client, signed data items, receipts
//! - `storage` - Local redb store and in-process content cache
//! - `indexer` - GraphQL listing with cache fallback
//! - `verify` - Receipt and existence verification
//! - `journal` - Facade tying the above together

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod gateway;
pub mod indexer;
pub mod journal;
pub mod models;
pub mod settlement;
pub mod state;
pub mod storage;
pub mod uploader;
pub mod verify;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;
