// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LRU cache for gateway content.
//!
//! Uploaded content is immutable under its id, so entries never expire; the
//! cache only bounds memory. Keys are content ids and are case-sensitive.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

/// In-process LRU cache of content id → text.
pub struct ContentCache {
    cache: Mutex<LruCache<String, String>>,
}

impl ContentCache {
    /// Create a cache holding at most `capacity` items (minimum one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, content_id: &str) -> Option<String> {
        let mut cache = self.cache.lock().ok()?;
        cache.get(content_id).cloned()
    }

    pub fn put(&self, content_id: &str, text: String) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(content_id.to_string(), text);
        }
    }
}
