// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ANS-104 data items signed with an Ethereum key.
//!
//! ## Binary Layout
//!
//! ```text
//! u16 LE   signature type (3 = Ethereum)
//! [65]     signature (r || s || v)
//! [65]     owner (uncompressed secp256k1 public key)
//! u8       target present (always 0)
//! u8       anchor present (always 1) + [32] anchor
//! u64 LE   tag count
//! u64 LE   encoded tag length
//! [..]     Avro-encoded tags
//! [..]     data
//! ```
//!
//! The signature is an EIP-191 personal signature over the deep hash of
//! `["dataitem", "1", "3", owner, target, anchor, tags, data]`, and the item
//! id is `base64url(sha256(signature))`.

use base64ct::{Base64UrlUnpadded, Encoding};
use sha2::{Digest, Sha256};

use super::deep_hash::{deep_hash, Chunk, Digest384};
use super::UploaderError;
use crate::models::Tag;
use crate::wallet::WalletSigner;

pub const SIGNATURE_TYPE_ETHEREUM: u16 = 3;
pub const SIGNATURE_LENGTH: usize = 65;
pub const OWNER_LENGTH: usize = 65;
const ANCHOR_LENGTH: usize = 32;

/// A signed, serialized data item ready to post.
#[derive(Debug, Clone)]
pub struct SignedDataItem {
    pub id: String,
    pub bytes: Vec<u8>,
}

/// Build and sign a data item carrying `data` and `tags`.
pub async fn sign_data_item(
    signer: &dyn WalletSigner,
    owner: &[u8; OWNER_LENGTH],
    tags: &[Tag],
    data: &[u8],
) -> Result<SignedDataItem, UploaderError> {
    let anchor = new_anchor();
    let encoded_tags = encode_tags(tags);

    let message = signature_data(owner, &anchor, &encoded_tags, data);
    let signature = signer.sign_message(&message).await?.as_bytes();

    let mut bytes = Vec::with_capacity(
        2 + SIGNATURE_LENGTH + OWNER_LENGTH + 2 + ANCHOR_LENGTH + 16 + encoded_tags.len() + data.len(),
    );
    bytes.extend_from_slice(&SIGNATURE_TYPE_ETHEREUM.to_le_bytes());
    bytes.extend_from_slice(&signature);
    bytes.extend_from_slice(owner);
    bytes.push(0);
    bytes.push(1);
    bytes.extend_from_slice(&anchor);
    bytes.extend_from_slice(&(tags.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&(encoded_tags.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&encoded_tags);
    bytes.extend_from_slice(data);

    Ok(SignedDataItem {
        id: item_id(&signature),
        bytes,
    })
}

/// Deep hash the signer commits to.
pub fn signature_data(
    owner: &[u8],
    anchor: &[u8],
    encoded_tags: &[u8],
    data: &[u8],
) -> Digest384 {
    let sig_type = SIGNATURE_TYPE_ETHEREUM.to_string();
    deep_hash(&Chunk::List(vec![
        Chunk::Blob(b"dataitem"),
        Chunk::Blob(b"1"),
        Chunk::Blob(sig_type.as_bytes()),
        Chunk::Blob(owner),
        Chunk::Blob(&[]),
        Chunk::Blob(anchor),
        Chunk::Blob(encoded_tags),
        Chunk::Blob(data),
    ]))
}

pub fn item_id(signature: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(&Sha256::digest(signature))
}

/// 32 ASCII bytes of randomness.
fn new_anchor() -> [u8; ANCHOR_LENGTH] {
    let mut anchor = [0u8; ANCHOR_LENGTH];
    anchor.copy_from_slice(uuid::Uuid::new_v4().simple().to_string().as_bytes());
    anchor
}

/// Avro encoding of `array<record { bytes name; bytes value; }>`.
///
/// An empty tag list encodes to no bytes at all.
pub fn encode_tags(tags: &[Tag]) -> Vec<u8> {
    if tags.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    write_long(&mut out, tags.len() as i64);
    for tag in tags {
        write_bytes(&mut out, tag.name.as_bytes());
        write_bytes(&mut out, tag.value.as_bytes());
    }
    write_long(&mut out, 0);
    out
}

fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_long(out, bytes.len() as i64);
    out.extend_from_slice(bytes);
}

/// Zigzag varint.
fn write_long(out: &mut Vec<u8>, value: i64) {
    let mut n = ((value << 1) ^ (value >> 63)) as u64;
    while n >= 0x80 {
        out.push((n as u8 & 0x7f) | 0x80);
        n >>= 7;
    }
    out.push(n as u8);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SimulatedWallet;
    use alloy::primitives::Signature;

    #[test]
    fn zigzag_varints() {
        let encode = |v| {
            let mut out = Vec::new();
            write_long(&mut out, v);
            out
        };
        assert_eq!(encode(0), [0x00]);
        assert_eq!(encode(1), [0x02]);
        assert_eq!(encode(-1), [0x01]);
        assert_eq!(encode(64), [0x80, 0x01]);
        assert_eq!(encode(300), [0xd8, 0x04]);
    }

    #[test]
    fn tags_encode_as_avro_block() {
        let encoded = encode_tags(&[Tag::new("a", "bc")]);
        assert_eq!(encoded, [0x02, 0x02, b'a', 0x04, b'b', b'c', 0x00]);
        assert!(encode_tags(&[]).is_empty());
    }

    #[tokio::test]
    async fn signed_item_recovers_to_wallet_address() {
        let wallet = SimulatedWallet::on_chain(1270);
        let owner = wallet.owner_key();
        let tags = [Tag::new("topic", "autumn")];
        let data = b"old pond";

        let item = sign_data_item(&wallet, &owner, &tags, data).await.unwrap();
        let bytes = &item.bytes;

        assert_eq!(&bytes[..2], &3u16.to_le_bytes());
        let signature = &bytes[2..67];
        assert_eq!(&bytes[67..132], owner.as_slice());
        assert_eq!(bytes[132], 0);
        assert_eq!(bytes[133], 1);
        let anchor = &bytes[134..166];
        assert_eq!(u64::from_le_bytes(bytes[166..174].try_into().unwrap()), 1);
        let tag_len = u64::from_le_bytes(bytes[174..182].try_into().unwrap()) as usize;
        let encoded_tags = &bytes[182..182 + tag_len];
        assert_eq!(&bytes[182 + tag_len..], data);

        assert_eq!(item.id, item_id(signature));
        assert_eq!(item.id.len(), 43);

        let message = signature_data(&owner, anchor, encoded_tags, data);
        let recovered = Signature::try_from(signature)
            .unwrap()
            .recover_address_from_msg(message)
            .unwrap();
        assert_eq!(recovered.to_checksum(None), WalletSigner::address(&wallet));
    }

    #[tokio::test]
    async fn each_item_gets_a_fresh_anchor_and_id() {
        let wallet = SimulatedWallet::on_chain(1270);
        let owner = wallet.owner_key();

        let first = sign_data_item(&wallet, &owner, &[], b"same").await.unwrap();
        let second = sign_data_item(&wallet, &owner, &[], b"same").await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
