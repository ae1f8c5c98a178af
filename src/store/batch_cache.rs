use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::feed::FeedQuery;
use crate::models::Paper;

/// Identifies one fetched page: topic filter, offset and page size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchKey {
    pub topic: String,
    pub offset: usize,
    pub size: usize,
}

impl From<&FeedQuery> for BatchKey {
    fn from(query: &FeedQuery) -> Self {
        Self {
            topic: query.filter.label().to_string(),
            offset: query.offset,
            size: query.size,
        }
    }
}

struct CachedBatch {
    papers: Vec<Paper>,
    expires_at: Instant,
}

/// Time-bounded memo of normalized pages. Expiry is the only eviction.
pub struct BatchCache {
    ttl: Duration,
    entries: DashMap<BatchKey, CachedBatch>,
}

impl BatchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &BatchKey) -> Option<Vec<Paper>> {
        let now = Instant::now();

        if let Some(cached) = self.entries.get(key) {
            if cached.expires_at > now {
                tracing::debug!(?key, "Batch cache hit");
                return Some(cached.papers.clone());
            }
        }

        if self
            .entries
            .remove_if(key, |_, cached| cached.expires_at <= now)
            .is_some()
        {
            tracing::debug!(?key, "Batch cache entry expired");
        }
        None
    }

    pub fn put(&self, key: BatchKey, papers: Vec<Paper>) {
        self.put_with_ttl(key, papers, self.ttl);
    }

    /// Later writes for the same key replace earlier ones.
    pub fn put_with_ttl(&self, key: BatchKey, papers: Vec<Paper>, ttl: Duration) {
        let now = Instant::now();
        self.entries.retain(|_, cached| cached.expires_at > now);
        self.entries.insert(
            key,
            CachedBatch {
                papers,
                expires_at: now + ttl,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
