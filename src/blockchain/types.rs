// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network selection and per-network endpoints.

use std::fmt;
use std::str::FromStr;

/// Irys network configuration, resolved once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID the wallet must be on
    pub chain_id: u64,
    /// Bundler currency identifier used in API paths
    pub token: &'static str,
    /// Display symbol
    pub symbol: &'static str,
    /// Decimals of the funding token
    pub decimals: u8,
    /// EVM JSON-RPC endpoint
    pub rpc_url: String,
    /// Bundler node (balance, funding, uploads)
    pub bundler_url: String,
    /// Gateway serving raw content by id
    pub gateway_url: String,
    /// Graph index endpoint
    pub graphql_url: String,
}

/// Chain ID of the Irys testnet.
pub const IRYS_TESTNET_CHAIN_ID: u64 = 1270;

/// Chain ID of Ethereum Sepolia, which funds the Irys devnet bundler.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Decimals of both supported funding tokens.
pub const TOKEN_DECIMALS: u8 = 18;

/// Supported networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    /// Irys testnet, funded with IRYS on chain 1270.
    #[default]
    Testnet,
    /// Irys devnet bundler, funded with Sepolia ETH.
    Devnet,
}

impl Network {
    /// Resolve an optional raw value (e.g. from the environment).
    ///
    /// Missing values select the testnet.
    pub fn resolve(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            None => Ok(Self::default()),
            Some(value) => value.parse(),
        }
    }

    /// Default endpoints for this network.
    pub fn config(self) -> NetworkConfig {
        match self {
            Network::Testnet => NetworkConfig {
                name: "Irys Testnet",
                chain_id: IRYS_TESTNET_CHAIN_ID,
                token: "irys",
                symbol: "IRYS",
                decimals: TOKEN_DECIMALS,
                rpc_url: "https://testnet-rpc.irys.xyz/v1".to_string(),
                bundler_url: "https://testnet.irys.xyz".to_string(),
                gateway_url: "https://gateway.irys.xyz".to_string(),
                graphql_url: "https://testnet.irys.xyz/graphql".to_string(),
            },
            Network::Devnet => NetworkConfig {
                name: "Irys Devnet (Sepolia)",
                chain_id: SEPOLIA_CHAIN_ID,
                token: "ethereum",
                symbol: "ETH",
                decimals: TOKEN_DECIMALS,
                rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
                bundler_url: "https://devnet.irys.xyz".to_string(),
                gateway_url: "https://devnet.irys.xyz".to_string(),
                graphql_url: "https://devnet.irys.xyz/graphql".to_string(),
            },
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            other => Err(format!(
                "Unsupported network `{other}` (expected `testnet` or `devnet`)"
            )),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Testnet => write!(f, "testnet"),
            Network::Devnet => write!(f, "devnet"),
        }
    }
}
