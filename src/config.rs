// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`Config`] loaded from them
//! once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `IRYS_NETWORK` | `testnet` or `devnet` | `testnet` |
//! | `IRYS_BUNDLER_URL` | Bundler node | per network |
//! | `IRYS_GATEWAY` | Gateway serving content by id | per network |
//! | `IRYS_GRAPHQL_URL` | GraphQL index endpoint | per network |
//! | `IRYS_RPC_URL` | EVM JSON-RPC endpoint | per network |
//! | `WALLET_PRIVATE_KEY` | Hex private key of the journal wallet | none |
//! | `WALLET_KEY_PATH` | PEM file holding the wallet key | none |
//! | `DATA_DIR` | Directory of the local store | `./data` |
//! | `HOST` | Server bind address | `127.0.0.1` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! Without a wallet key the server still lists and verifies haiku, but
//! connecting, funding and uploading fail with a connection error.

use std::path::PathBuf;

use crate::blockchain::{Network, NetworkConfig};

pub const NETWORK_ENV: &str = "IRYS_NETWORK";
pub const BUNDLER_URL_ENV: &str = "IRYS_BUNDLER_URL";
pub const GATEWAY_ENV: &str = "IRYS_GATEWAY";
pub const GRAPHQL_URL_ENV: &str = "IRYS_GRAPHQL_URL";
pub const RPC_URL_ENV: &str = "IRYS_RPC_URL";

/// Hex-encoded private key (with or without `0x`).
///
/// Takes precedence over [`WALLET_KEY_PATH_ENV`].
pub const WALLET_PRIVATE_KEY_ENV: &str = "WALLET_PRIVATE_KEY";
pub const WALLET_KEY_PATH_ENV: &str = "WALLET_KEY_PATH";

/// Environment variable name for the local store directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "./data";

pub const HOST_ENV: &str = "HOST";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8080;

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}")]
    Network(String),

    #[error("Invalid URL in {var}: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Where the wallet key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletKey {
    Hex(String),
    PemFile(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub network: NetworkConfig,
    pub wallet_key: Option<WalletKey>,
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let network = Network::resolve(get(NETWORK_ENV).as_deref()).map_err(ConfigError::Network)?;
        let mut network = network.config();
        if let Some(url) = get(BUNDLER_URL_ENV) {
            network.bundler_url = validated_url(BUNDLER_URL_ENV, url)?;
        }
        if let Some(url) = get(GATEWAY_ENV) {
            network.gateway_url = validated_url(GATEWAY_ENV, url)?;
        }
        if let Some(url) = get(GRAPHQL_URL_ENV) {
            network.graphql_url = validated_url(GRAPHQL_URL_ENV, url)?;
        }
        if let Some(url) = get(RPC_URL_ENV) {
            network.rpc_url = validated_url(RPC_URL_ENV, url)?;
        }

        let wallet_key = match (get(WALLET_PRIVATE_KEY_ENV), get(WALLET_KEY_PATH_ENV)) {
            (Some(hex), _) => Some(WalletKey::Hex(hex)),
            (None, Some(path)) => Some(WalletKey::PemFile(PathBuf::from(path))),
            (None, None) => None,
        };

        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_ascii_lowercase()) {
            None => LogFormat::default(),
            Some(v) if v == "json" => LogFormat::Json,
            Some(v) if v == "pretty" => LogFormat::Pretty,
            Some(v) => {
                return Err(ConfigError::InvalidValue {
                    var: LOG_FORMAT_ENV,
                    value: v,
                })
            }
        };

        Ok(Self {
            network,
            wallet_key,
            data_dir: PathBuf::from(get(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.into())),
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            log_format,
        })
    }
}

fn validated_url(var: &'static str, raw: String) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            var,
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        });
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}
