// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM side of the journal: network selection, key loading, token units,
//! and the locally-held wallet used when the server signs for itself.

pub mod client;
pub mod signing;
pub mod types;
pub mod units;

pub use client::LocalWallet;
pub use types::*;
pub use units::{from_atomic, to_atomic, UnitsError};
