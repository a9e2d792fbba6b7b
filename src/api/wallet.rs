// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    error::ApiError,
    models::{BalanceResponse, FundRequest, FundResponse, WalletState},
    settlement::SettlementWatcher,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/wallet",
    tag = "Wallet",
    responses((status = 200, body = WalletState))
)]
pub async fn get_wallet(State(state): State<AppState>) -> Json<WalletState> {
    Json(state.journal.wallet_state().await)
}

#[utoipa::path(
    post,
    path = "/v1/wallet/connect",
    tag = "Wallet",
    responses(
        (status = 200, body = WalletState),
        (status = 401, description = "No wallet available or access rejected"),
        (status = 409, description = "Wallet is on the wrong chain")
    )
)]
pub async fn connect_wallet(State(state): State<AppState>) -> Result<Json<WalletState>, ApiError> {
    Ok(Json(state.journal.connect().await?))
}

#[utoipa::path(
    post,
    path = "/v1/wallet/disconnect",
    tag = "Wallet",
    responses((status = 200, body = WalletState))
)]
pub async fn disconnect_wallet(State(state): State<AppState>) -> Json<WalletState> {
    state.journal.disconnect().await;
    Json(state.journal.wallet_state().await)
}

#[utoipa::path(
    get,
    path = "/v1/balance",
    tag = "Wallet",
    responses((status = 200, body = BalanceResponse))
)]
pub async fn get_balance(State(state): State<AppState>) -> Json<BalanceResponse> {
    Json(BalanceResponse {
        balance: state.journal.get_balance().await,
        symbol: state.journal.token_symbol().to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/v1/fund",
    request_body = FundRequest,
    tag = "Wallet",
    responses(
        (status = 200, body = FundResponse),
        (status = 400, description = "Amount is not a positive decimal"),
        (status = 401, description = "Wallet not connected"),
        (status = 502, description = "Funding transfer failed")
    )
)]
pub async fn fund(
    State(state): State<AppState>,
    Json(request): Json<FundRequest>,
) -> Result<Json<FundResponse>, ApiError> {
    let baseline = state.journal.wallet_state().await.balance;
    let tx = state.journal.fund(&request.amount).await?;

    if !request.wait {
        return Ok(Json(FundResponse {
            tx,
            balance: state.journal.wallet_state().await.balance,
            settled: None,
        }));
    }

    let outcome = SettlementWatcher::new(state.journal.clone())
        .wait(&baseline, state.shutdown.clone())
        .await;
    Ok(Json(FundResponse {
        tx,
        balance: outcome.balance().to_string(),
        settled: Some(outcome.is_settled()),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::tests::{app, get, json_body, post_json, send};
    use crate::testing::SimulatedWallet;

    #[tokio::test]
    async fn connect_then_read_state_and_balance() {
        let (app, _state, _dir) = app(Some(SimulatedWallet::on_chain(1270)), "2");

        let response = send(&app, post_json("/v1/wallet/connect", json!({}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["isConnected"], true);
        assert_eq!(body["balance"], "2");

        let body = json_body(send(&app, get("/v1/wallet")).await).await;
        assert!(body["address"].as_str().unwrap().starts_with("0x"));

        let body = json_body(send(&app, get("/v1/balance")).await).await;
        assert_eq!(body, json!({ "balance": "2", "symbol": "IRYS" }));

        let body = json_body(send(&app, post_json("/v1/wallet/disconnect", json!({}))).await).await;
        assert_eq!(body["isConnected"], false);
    }

    #[tokio::test]
    async fn wrong_chain_is_conflict() {
        let (app, _state, _dir) = app(Some(SimulatedWallet::on_chain(1)), "2");

        let response = send(&app, post_json("/v1/wallet/connect", json!({}))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("1270"));
    }

    #[tokio::test]
    async fn missing_wallet_is_unauthorized() {
        let (app, _state, _dir) = app(None, "2");

        let response = send(&app, post_json("/v1/wallet/connect", json!({}))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(&app, post_json("/v1/fund", json!({ "amount": "1" }))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn fund_validates_and_optionally_waits() {
        let (app, _state, _dir) = app(Some(SimulatedWallet::on_chain(1270)), "0");
        send(&app, post_json("/v1/wallet/connect", json!({}))).await;

        let response = send(&app, post_json("/v1/fund", json!({ "amount": "nope" }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, post_json("/v1/fund", json!({ "amount": "0.2" }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["tx"]["quantity"], "200000000000000000");
        assert_eq!(body["balance"], "0");
        assert!(body.get("settled").is_none());

        // Settles on the first poll: the previous funding already landed.
        let response = send(
            &app,
            post_json("/v1/fund", json!({ "amount": "0.1", "wait": true })),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["settled"], true);
        assert_eq!(body["balance"], "0.3");
    }
}
