// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::CacheError;

/// Errors surfaced by the journal to its callers.
///
/// Balance reads, index queries and verification never produce one of
/// these; they degrade to a safe default instead. The one exception is the
/// balance check before an upload, which reports `BalanceUnavailable`.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("Wallet connection failed: {0}")]
    Connection(String),

    #[error("Wrong network: switch the wallet to chain {required} (currently on {actual})")]
    ChainMismatch { required: u64, actual: u64 },

    #[error("Insufficient balance: {balance} {token} available, at least {required} {token} required")]
    InsufficientBalance {
        balance: String,
        required: String,
        token: String,
    },

    #[error("Prepaid balance unavailable, upload not attempted: {0}")]
    BalanceUnavailable(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Funding failed: {0}")]
    Funding(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        let status = match &err {
            JournalError::Connection(_) => StatusCode::UNAUTHORIZED,
            JournalError::ChainMismatch { .. } => StatusCode::CONFLICT,
            JournalError::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
            JournalError::InvalidAmount(_) | JournalError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            JournalError::Upload(_) | JournalError::Funding(_) => StatusCode::BAD_GATEWAY,
            JournalError::BalanceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            JournalError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
