use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use super::repository::Repository;
use crate::error::Result;
use crate::models::GeneratedSummary;

/// What a producer hands back to the ledger on a miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducedSummary {
    pub content: String,
    pub model: String,
}

/// Durable memo of generated summaries. At most one producer runs per paper
/// identity at a time, and the first stored summary is the one every later
/// request sees.
pub struct SummaryLedger {
    repository: Arc<Repository>,
    in_flight: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
}

impl SummaryLedger {
    pub fn new(repository: Arc<Repository>) -> Self {
        Self {
            repository,
            in_flight: DashMap::new(),
        }
    }

    pub async fn get(&self, paper_id: &str) -> Result<Option<GeneratedSummary>> {
        self.repository.get_summary(paper_id).await
    }

    pub async fn get_or_create<F, Fut>(&self, paper_id: &str, producer: F) -> Result<GeneratedSummary>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ProducedSummary>>,
    {
        if let Some(summary) = self.repository.get_summary(paper_id).await? {
            tracing::debug!(paper_id, "Summary ledger hit");
            return Ok(summary);
        }

        let lock = self.lock_for(paper_id);
        let result = {
            let _guard = lock.lock().await;
            self.create_locked(paper_id, producer).await
        };
        drop(lock);
        self.release(paper_id);
        result
    }

    async fn create_locked<F, Fut>(&self, paper_id: &str, producer: F) -> Result<GeneratedSummary>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ProducedSummary>>,
    {
        // Another request may have finished while we waited for the lock.
        if let Some(summary) = self.repository.get_summary(paper_id).await? {
            tracing::debug!(paper_id, "Summary produced by a concurrent request");
            return Ok(summary);
        }

        let produced = producer().await?;
        let inserted = self
            .repository
            .insert_summary(paper_id, produced.content.clone(), produced.model.clone())
            .await?;

        if inserted {
            tracing::info!(paper_id, model = %produced.model, "Stored new summary");
        }

        match self.repository.get_summary(paper_id).await? {
            Some(summary) => Ok(summary),
            None => Ok(GeneratedSummary {
                paper_id: paper_id.to_string(),
                content: produced.content,
                model_version: produced.model,
                generated_at: Utc::now(),
            }),
        }
    }

    fn lock_for(&self, paper_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        // Clone the Arc so the shard lock is released before awaiting
        self.in_flight
            .entry(paper_id.to_string())
            .or_default()
            .clone()
    }

    fn release(&self, paper_id: &str) {
        // Only the map still holds it: nobody is waiting.
        self.in_flight
            .remove_if(paper_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
