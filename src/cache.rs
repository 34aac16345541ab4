//! Time-bounded resolution cache.
//!
//! Memoizes resolved descriptor sequences per content reference so repeat
//! requests inside the freshness window skip provider traffic entirely.
//! Eviction is lazy: staleness is checked on lookup, never by a background
//! sweep. Concurrent requests for the same key may both miss and both
//! resolve: extraction is idempotent, so the race costs redundant work,
//! not correctness, and `put` is last-writer-wins.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::descriptor::Stream;
use crate::provider::ContentRef;

struct CacheEntry {
    streams: Vec<Stream>,
    created_at: Instant,
}

/// In-memory, process-lifetime cache of resolved streams.
pub struct StreamCache {
    ttl: Duration,
    entries: RwLock<HashMap<ContentRef, CacheEntry>>,
}

impl StreamCache {
    /// Cache with the given freshness window.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up `key`. An entry older than the freshness window counts as a
    /// miss and is removed on the spot.
    pub async fn get(&self, key: &ContentRef) -> Option<Vec<Stream>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.created_at.elapsed() < self.ttl => {
                    debug!(id = %key.id, "cache hit");
                    return Some(entry.streams.clone());
                }
                Some(_) => {}
            }
        }

        debug!(id = %key.id, "cache entry stale, evicting");
        self.entries.write().await.remove(key);
        None
    }

    /// Store a resolved sequence. Unconditional overwrite.
    pub async fn put(&self, key: ContentRef, streams: Vec<Stream>) {
        self.entries.write().await.insert(
            key,
            CacheEntry {
                streams,
                created_at: Instant::now(),
            },
        );
    }

    /// Number of live entries (stale ones included until touched).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
