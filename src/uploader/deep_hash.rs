// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SHA-384 deep hash over nested byte lists.
//!
//! Blobs hash as `sha384(sha384("blob" + len) || sha384(bytes))`. Lists fold
//! their items into an accumulator seeded with `sha384("list" + count)`.
//! Data item signatures and bundler receipts are both computed over this.

use sha2::{Digest, Sha384};

pub type Digest384 = [u8; 48];

/// A node in the structure being hashed.
#[derive(Debug, Clone)]
pub enum Chunk<'a> {
    Blob(&'a [u8]),
    List(Vec<Chunk<'a>>),
}

pub fn deep_hash(chunk: &Chunk<'_>) -> Digest384 {
    match chunk {
        Chunk::Blob(bytes) => {
            let tag = sha384(format!("blob{}", bytes.len()).as_bytes());
            let data = sha384(bytes);
            sha384_pair(&tag, &data)
        }
        Chunk::List(items) => {
            let mut acc = sha384(format!("list{}", items.len()).as_bytes());
            for item in items {
                acc = sha384_pair(&acc, &deep_hash(item));
            }
            acc
        }
    }
}

fn sha384(bytes: &[u8]) -> Digest384 {
    let mut out = [0u8; 48];
    out.copy_from_slice(&Sha384::digest(bytes));
    out
}

fn sha384_pair(a: &Digest384, b: &Digest384) -> Digest384 {
    let mut hasher = Sha384::new();
    hasher.update(a);
    hasher.update(b);
    let mut out = [0u8; 48];
    out.copy_from_slice(&hasher.finalize());
    out
}
