use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;

use crate::ai::{
    HuggingFaceBackend, InferenceBackend, ModelRegistry, Summarizer, SummaryPolicy, SummaryRequest,
};
use crate::config::Config;
use crate::db::{ProducedSummary, Repository, SummaryLedger};
use crate::error::{AppError, Result};
use crate::feed::{normalize, ArxivClient, FeedQuery, FeedSource, TopicFilter};
use crate::models::{GeneratedSummary, Paper};
use crate::services::{truncate_chars, PdfExtractor};
use crate::store::{Batch, BatchCache, BatchKey, PaperStore};

/// Request parameters for one page view.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub topic: String,
    pub page: usize,
    pub page_size: usize,
}

impl FetchRequest {
    pub fn new(topic: impl Into<String>, page: usize, page_size: usize) -> Self {
        Self {
            topic: topic.into(),
            page,
            page_size,
        }
    }

    fn query(&self) -> Result<FeedQuery> {
        if self.page_size == 0 {
            return Err(AppError::InvalidRequest("page size must be at least 1".to_string()));
        }
        let filter = TopicFilter::parse(&self.topic)?;
        FeedQuery::for_page(filter, self.page, self.page_size)
    }
}

pub struct App {
    feed: Arc<dyn FeedSource>,
    cache: BatchCache,
    store: PaperStore,
    extractor: PdfExtractor,
    summarizer: Summarizer,
    ledger: SummaryLedger,
    timezone: Tz,
    max_input_chars: usize,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let feed: Arc<dyn FeedSource> = Arc::new(ArxivClient::new(config.feed_url.clone())?);
        let repository = Repository::new(&config.db_path).await?;

        let endpoint = config.inference.endpoint.clone();
        let api_token = config.api_token();
        let timeout = Duration::from_secs(config.inference.timeout_secs);
        let default: Arc<dyn InferenceBackend> = Arc::new(HuggingFaceBackend::new(
            endpoint.clone(),
            config.inference.default_model.clone(),
            api_token.clone(),
            timeout,
        )?);
        let registry = ModelRegistry::new(
            default,
            Box::new(move |model| {
                let backend =
                    HuggingFaceBackend::new(endpoint.clone(), model, api_token.clone(), timeout)?;
                Ok(Arc::new(backend) as Arc<dyn InferenceBackend>)
            }),
        );

        Self::with_parts(
            config,
            feed,
            Arc::new(registry),
            repository,
            PdfExtractor::new(config.pdf_timeout())?,
        )
    }

    /// Wires the pipeline from already-built collaborators.
    pub fn with_parts(
        config: &Config,
        feed: Arc<dyn FeedSource>,
        registry: Arc<ModelRegistry>,
        repository: Repository,
        extractor: PdfExtractor,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            feed,
            cache: BatchCache::new(config.cache_ttl()),
            store: PaperStore::new(),
            extractor,
            summarizer: Summarizer::new(registry, SummaryPolicy::from(&config.summary)),
            ledger: SummaryLedger::new(Arc::new(repository)),
            timezone: config.timezone()?,
            max_input_chars: config.max_input_chars,
        })
    }

    /// Fetches one page of papers. A cached page short-circuits the feed; either
    /// way the result becomes the store's current batch and is returned as an
    /// explicit handle for later lookups.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Arc<Batch>> {
        let query = request.query()?;
        let key = BatchKey::from(&query);

        let papers = match self.cache.get(&key) {
            Some(papers) => papers,
            None => {
                let entries = self.feed.fetch(&query).await?;
                let papers = normalize(entries, self.timezone);
                self.cache.put(key.clone(), papers.clone());
                papers
            }
        };

        Ok(self.store.replace(key, papers))
    }

    pub fn current_batch(&self) -> Option<Arc<Batch>> {
        self.store.current()
    }

    /// PDF link for a paper, for handing off to a browser.
    pub fn pdf_link(&self, batch: &Batch, id: usize) -> Result<String> {
        let paper = Self::paper(batch, id)?;
        paper
            .pdf_link
            .clone()
            .ok_or_else(|| AppError::NoPdfLink(paper.paper_id.clone()))
    }

    /// Summary of a paper's full text, generated at most once per paper.
    pub async fn summarize(
        &self,
        batch: &Batch,
        id: usize,
        request: &SummaryRequest,
    ) -> Result<GeneratedSummary> {
        let paper = Self::paper(batch, id)?;
        let pdf_url = paper
            .pdf_link
            .clone()
            .ok_or_else(|| AppError::NoPdfLink(paper.paper_id.clone()))?;

        tracing::info!(paper_id = %paper.paper_id, id, "Summarize requested");

        self.ledger
            .get_or_create(&paper.paper_id, || async {
                let text = self
                    .extractor
                    .extract(&pdf_url)
                    .await
                    .ok_or_else(|| AppError::ExtractionFailed(pdf_url.clone()))?;

                let input = truncate_chars(text.trim(), self.max_input_chars);
                if input.trim().is_empty() {
                    return Err(AppError::ExtractionFailed(pdf_url.clone()));
                }
                let output = self.summarizer.summarize(input, request).await?;
                Ok(ProducedSummary {
                    content: output.text,
                    model: output.model,
                })
            })
            .await
    }

    /// Summarizes against whatever batch the store currently holds.
    pub async fn summarize_current(&self, id: usize, request: &SummaryRequest) -> Result<GeneratedSummary> {
        let batch = self.store.current().ok_or(AppError::PaperNotFound(id))?;
        self.summarize(&batch, id, request).await
    }

    fn paper(batch: &Batch, id: usize) -> Result<&Paper> {
        batch.get(id).ok_or(AppError::PaperNotFound(id))
    }
}
