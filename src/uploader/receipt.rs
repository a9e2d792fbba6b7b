// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bundler receipt signature check.

use alloy::primitives::Signature;
use base64ct::{Base64UrlUnpadded, Encoding};

use super::deep_hash::{deep_hash, Chunk, Digest384};
use super::UploaderError;
use crate::models::Receipt;

/// Deep hash a bundler signs when it issues a receipt.
///
/// `None` when the receipt lacks the deadline height it commits to.
pub fn receipt_message(receipt: &Receipt) -> Option<Digest384> {
    let deadline = receipt.deadline_height?.to_string();
    let timestamp = receipt.timestamp.to_string();
    Some(deep_hash(&Chunk::List(vec![
        Chunk::Blob(b"Bundlr"),
        Chunk::Blob(receipt.protocol_version.as_bytes()),
        Chunk::Blob(receipt.id.as_bytes()),
        Chunk::Blob(deadline.as_bytes()),
        Chunk::Blob(timestamp.as_bytes()),
    ])))
}

/// Check that the receipt was signed by the secp256k1 key in `public`.
///
/// `Ok(false)` covers receipts that are well-formed but do not verify.
/// Receipts signed with any other key type are [`UploaderError::UnsupportedReceipt`].
pub fn verify_receipt_signature(receipt: &Receipt) -> Result<bool, UploaderError> {
    let public = receipt
        .public
        .as_deref()
        .ok_or_else(|| UploaderError::UnsupportedReceipt("missing public key".to_string()))?;
    let public = decode(public)?;
    if public.len() != 65 || public[0] != 0x04 {
        return Err(UploaderError::UnsupportedReceipt(format!(
            "expected a 65-byte secp256k1 key, got {} bytes",
            public.len()
        )));
    }

    let Some(message) = receipt_message(receipt) else {
        return Ok(false);
    };

    let signature = decode(&receipt.signature)?;
    let Ok(signature) = Signature::try_from(signature.as_slice()) else {
        return Ok(false);
    };

    match signature.recover_from_msg(message) {
        Ok(key) => Ok(key.to_encoded_point(false).as_bytes() == public.as_slice()),
        Err(_) => Ok(false),
    }
}

fn decode(value: &str) -> Result<Vec<u8>, UploaderError> {
    Base64UrlUnpadded::decode_vec(value.trim_end_matches('='))
        .map_err(|e| UploaderError::InvalidResponse(format!("invalid base64url: {e}")))
}
