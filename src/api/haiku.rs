// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::ApiError,
    models::{
        UploadRecord, UploadRequest, UploadResponse, UrlResponse, Verification, VerifyResponse,
    },
    state::AppState,
};

#[derive(Deserialize, IntoParams)]
pub struct AuthorQuery {
    /// Author address (any letter case).
    pub author: String,
}

#[utoipa::path(
    post,
    path = "/v1/haiku",
    request_body = UploadRequest,
    tag = "Haiku",
    responses(
        (status = 201, body = UploadResponse),
        (status = 400, description = "Empty text or topic"),
        (status = 401, description = "Wallet not connected"),
        (status = 402, description = "Prepaid balance below the upload minimum"),
        (status = 502, description = "Upload failed"),
        (status = 503, description = "Prepaid balance could not be read")
    )
)]
pub async fn upload_haiku(
    State(state): State<AppState>,
    Json(request): Json<UploadRequest>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let receipt = state
        .journal
        .upload(&request.text, &request.topic, request.author.as_deref())
        .await?;
    let url = state.journal.gateway_url(&receipt.id);
    Ok((StatusCode::CREATED, Json(UploadResponse { receipt, url })))
}

#[utoipa::path(
    get,
    path = "/v1/haiku",
    params(AuthorQuery),
    tag = "Haiku",
    responses((status = 200, body = [UploadRecord]))
)]
pub async fn list_haiku(
    State(state): State<AppState>,
    Query(params): Query<AuthorQuery>,
) -> Result<Json<Vec<UploadRecord>>, ApiError> {
    if params.author.trim().is_empty() {
        return Err(ApiError::bad_request("author must not be empty"));
    }
    Ok(Json(state.journal.list_for_author(params.author.trim()).await))
}

#[utoipa::path(
    get,
    path = "/v1/haiku/{content_id}/verify",
    params(
        ("content_id" = String, Path, description = "Content id returned at upload")
    ),
    tag = "Haiku",
    responses((status = 200, body = VerifyResponse))
)]
pub async fn verify_haiku(
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Json<VerifyResponse> {
    let status = state.journal.check(&content_id).await;
    Json(VerifyResponse {
        verified: status == Verification::Verified,
        id: content_id,
        status,
    })
}

#[utoipa::path(
    get,
    path = "/v1/haiku/{content_id}/url",
    params(
        ("content_id" = String, Path, description = "Content id returned at upload")
    ),
    tag = "Haiku",
    responses((status = 200, body = UrlResponse))
)]
pub async fn haiku_url(
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Json<UrlResponse> {
    Json(UrlResponse {
        url: state.journal.gateway_url(&content_id),
        id: content_id,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::tests::{app, get, json_body, post_json, send};
    use crate::testing::SimulatedWallet;

    const HAIKU: &str = "an old silent pond\na frog jumps into the pond\nsplash! silence again";

    #[tokio::test]
    async fn upload_list_verify_flow() {
        let (app, _state, _dir) = app(Some(SimulatedWallet::on_chain(1270)), "1");
        let connected = json_body(send(&app, post_json("/v1/wallet/connect", json!({}))).await).await;
        let address = connected["address"].as_str().unwrap().to_string();

        let response = send(
            &app,
            post_json("/v1/haiku", json!({ "text": HAIKU, "topic": "frog" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        let id = body["receipt"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["url"], format!("http://127.0.0.1:9/{id}"));

        let listed = json_body(
            send(&app, get(&format!("/v1/haiku?author={}", address.to_lowercase()))).await,
        )
        .await;
        assert_eq!(listed[0]["id"], id.as_str());
        assert_eq!(listed[0]["text"], HAIKU);
        assert_eq!(listed[0]["author"], address.as_str());

        let verified = json_body(send(&app, get(&format!("/v1/haiku/{id}/verify"))).await).await;
        assert_eq!(
            verified,
            json!({ "id": id, "verified": true, "status": "verified" })
        );
    }

    #[tokio::test]
    async fn upload_errors_map_to_statuses() {
        let (app, _state, _dir) = app(Some(SimulatedWallet::on_chain(1270)), "0");

        let response = send(
            &app,
            post_json("/v1/haiku", json!({ "text": HAIKU, "topic": "frog" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        send(&app, post_json("/v1/wallet/connect", json!({}))).await;
        let response = send(
            &app,
            post_json("/v1/haiku", json!({ "text": HAIKU, "topic": "frog" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

        let response = send(
            &app,
            post_json("/v1/haiku", json!({ "text": " ", "topic": "frog" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_content_is_not_verified() {
        let (app, _state, _dir) = app(None, "0");

        let body = json_body(send(&app, get("/v1/haiku/nothing/verify")).await).await;
        assert_eq!(body["verified"], false);
        assert_eq!(body["status"], "not_found");

        let body = json_body(send(&app, get("/v1/haiku/abc/url")).await).await;
        assert_eq!(body, json!({ "id": "abc", "url": "http://127.0.0.1:9/abc" }));
    }

    #[tokio::test]
    async fn listing_requires_author() {
        let (app, _state, _dir) = app(None, "0");

        let response = send(&app, get("/v1/haiku?author=")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, get("/v1/haiku?author=0xABC")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
    }
}
