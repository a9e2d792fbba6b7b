// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc};

use haiku_journal::{
    api::router,
    blockchain::{
        signing::{signer_from_hex, signer_from_pem},
        LocalWallet,
    },
    config::{Config, LogFormat, WalletKey, DEFAULT_LOG_FILTER},
    gateway::Gateway,
    indexer::{RemoteIndex, QUERY_TIMEOUT},
    journal::Journal,
    models::APP_NAME,
    state::AppState,
    storage::{LocalCache, LOCAL_STORE_FILE},
    uploader::{BundlerFactory, StorageClient},
    wallet::{WalletProvider, WalletSession, WalletSigner},
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = Config::from_env().expect("Invalid configuration");
    init_tracing(config.log_format);

    let network = config.network.clone();
    tracing::info!(
        network = network.name,
        chain_id = network.chain_id,
        bundler = %network.bundler_url,
        "Starting haiku journal"
    );

    let cache = Arc::new(
        LocalCache::open(&config.data_dir.join(LOCAL_STORE_FILE))
            .expect("Failed to open local store"),
    );

    let wallet = config.wallet_key.as_ref().map(|key| {
        let signer = match key {
            WalletKey::Hex(hex) => signer_from_hex(hex),
            WalletKey::PemFile(path) => {
                let bytes = std::fs::read(path).expect("Failed to read wallet key file");
                signer_from_pem(&bytes)
            }
        }
        .expect("Invalid wallet key");
        Arc::new(LocalWallet::new(network.clone(), signer).expect("Failed to create wallet"))
    });
    if wallet.is_none() {
        tracing::warn!("No wallet key configured; uploads and funding are disabled");
    }
    let provider = wallet.clone().map(|w| w as Arc<dyn WalletProvider>);
    let signer = wallet.map(|w| w as Arc<dyn WalletSigner>);

    let factory = Arc::new(BundlerFactory::new(&network).expect("Failed to build bundler client"));
    let storage = Arc::new(StorageClient::new(
        signer,
        factory,
        network.chain_id,
        network.symbol,
        network.decimals,
    ));
    let gateway = Arc::new(Gateway::new(&network.gateway_url).expect("Failed to build gateway"));
    let index_http = reqwest::Client::builder()
        .timeout(QUERY_TIMEOUT)
        .build()
        .expect("Failed to build index client");
    let index = RemoteIndex::new(
        &network.graphql_url,
        APP_NAME,
        index_http,
        gateway.clone(),
        cache.clone(),
    );

    let journal = Arc::new(Journal::new(
        WalletSession::new(provider, network.chain_id),
        storage,
        cache,
        index,
        gateway,
    ));

    match journal.restore().await {
        Ok(Some(state)) => tracing::info!(
            address = state.address.as_deref().unwrap_or_default(),
            balance = %state.balance,
            "Restored wallet session"
        ),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Could not restore wallet session"),
    }

    let shutdown = CancellationToken::new();
    let app = router(AppState::new(journal, shutdown.clone()));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(%addr, "Haiku journal listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .expect("HTTP server failed");
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Resolves on Ctrl+C or SIGTERM and cancels in-flight waits.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
    shutdown.cancel();
}
