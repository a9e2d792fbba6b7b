// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        BalanceResponse, FundRequest, FundResponse, FundTx, Receipt, UploadRecord, UploadRequest,
        UploadResponse, UrlResponse, Verification, VerifyResponse, WalletState,
    },
    state::AppState,
};

pub mod haiku;
pub mod health;
pub mod wallet;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/wallet", get(wallet::get_wallet))
        .route("/wallet/connect", post(wallet::connect_wallet))
        .route("/wallet/disconnect", post(wallet::disconnect_wallet))
        .route("/balance", get(wallet::get_balance))
        .route("/fund", post(wallet::fund))
        .route(
            "/haiku",
            get(haiku::list_haiku).post(haiku::upload_haiku),
        )
        .route("/haiku/{content_id}/verify", get(haiku::verify_haiku))
        .route("/haiku/{content_id}/url", get(haiku::haiku_url))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health::health))
        .with_state(state)
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        wallet::get_wallet,
        wallet::connect_wallet,
        wallet::disconnect_wallet,
        wallet::get_balance,
        wallet::fund,
        haiku::upload_haiku,
        haiku::list_haiku,
        haiku::verify_haiku,
        haiku::haiku_url
    ),
    components(
        schemas(
            WalletState,
            BalanceResponse,
            FundRequest,
            FundResponse,
            FundTx,
            Receipt,
            UploadRecord,
            UploadRequest,
            UploadResponse,
            Verification,
            VerifyResponse,
            UrlResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Wallet", description = "Wallet connection, balance and funding"),
        (name = "Haiku", description = "Permanent haiku uploads, listing and verification")
    )
)]
struct ApiDoc;
