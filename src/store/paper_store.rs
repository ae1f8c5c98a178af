use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use super::batch_cache::BatchKey;
use crate::models::{group_by_day, DayGroup, Paper};

/// The papers returned by one fetch. Ids index into `papers`.
#[derive(Debug)]
pub struct Batch {
    pub token: u64,
    pub key: BatchKey,
    pub papers: Vec<Paper>,
    pub fetched_at: DateTime<Utc>,
}

impl Batch {
    pub fn get(&self, id: usize) -> Option<&Paper> {
        self.papers.get(id).filter(|p| p.id == id)
    }

    pub fn days(&self) -> Vec<DayGroup<'_>> {
        group_by_day(&self.papers)
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}

/// Holds the most recently fetched batch. Every fetch replaces it wholesale
/// under a new token; callers holding an older `Arc<Batch>` keep resolving
/// against that batch.
pub struct PaperStore {
    next_token: AtomicU64,
    current: RwLock<Option<Arc<Batch>>>,
}

impl PaperStore {
    pub fn new() -> Self {
        Self {
            next_token: AtomicU64::new(1),
            current: RwLock::new(None),
        }
    }

    pub fn replace(&self, key: BatchKey, papers: Vec<Paper>) -> Arc<Batch> {
        let batch = Arc::new(Batch {
            token: self.next_token.fetch_add(1, Ordering::Relaxed),
            key,
            papers,
            fetched_at: Utc::now(),
        });
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Some(Arc::clone(&batch));
        batch
    }

    pub fn current(&self) -> Option<Arc<Batch>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for PaperStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Published;

    fn key() -> BatchKey {
        BatchKey {
            topic: "all".to_string(),
            offset: 0,
            size: 10,
        }
    }

    fn papers(titles: &[&str]) -> Vec<Paper> {
        titles
            .iter()
            .enumerate()
            .map(|(id, title)| Paper {
                id,
                paper_id: format!("id-{}", title),
                title: title.to_string(),
                abstract_link: String::new(),
                pdf_link: None,
                summary_text: String::new(),
                tags: Vec::new(),
                published: Published::Raw(String::new()),
            })
            .collect()
    }

    #[test]
    fn test_replace_is_wholesale() {
        let store = PaperStore::new();
        let first = store.replace(key(), papers(&["a", "b", "c"]));
        let second = store.replace(key(), papers(&["d"]));

        assert!(second.token > first.token);
        let current = store.current().unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current.get(0).unwrap().title, "d");
        assert!(current.get(1).is_none());
    }

    #[test]
    fn test_old_handle_outlives_replacement() {
        let store = PaperStore::new();
        let first = store.replace(key(), papers(&["a", "b"]));
        let second = store.replace(key(), papers(&["c", "d"]));

        assert_eq!(store.current().unwrap().token, second.token);
        assert_eq!(first.get(1).unwrap().title, "b");
        assert_eq!(second.get(1).unwrap().title, "d");
    }

    #[test]
    fn test_empty_store() {
        let store = PaperStore::new();
        assert!(store.current().is_none());
    }
}
