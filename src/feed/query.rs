use super::topics::TopicFilter;
use crate::error::{AppError, Result};

/// Category restriction AND-ed with every topic clause.
const BASE_CATEGORIES: &str = "(cat:cs.AI+OR+cat:cs.LG+OR+cat:stat.ML)";

/// One page of a boolean search against the feed API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub filter: TopicFilter,
    pub offset: usize,
    pub size: usize,
}

impl FeedQuery {
    pub fn new(filter: TopicFilter, offset: usize, size: usize) -> Self {
        Self {
            filter,
            offset,
            size,
        }
    }

    /// `page` is 1-based; page 0 is read as the first page.
    pub fn for_page(filter: TopicFilter, page: usize, size: usize) -> Result<Self> {
        let page = page.max(1);
        let offset = (page - 1).checked_mul(size).ok_or_else(|| {
            AppError::InvalidRequest(format!("page {} is out of range for page size {}", page, size))
        })?;
        Ok(Self::new(filter, offset, size))
    }

    pub fn search_query(&self) -> String {
        let topics = self
            .filter
            .topics()
            .iter()
            .map(|topic| format!("all:%22{}%22", urlencoding::encode(topic.label)))
            .collect::<Vec<_>>()
            .join("+OR+");
        format!("{}+AND+({})", BASE_CATEGORIES, topics)
    }

    pub fn query_string(&self) -> String {
        format!(
            "search_query={}&start={}&max_results={}&sortBy=submittedDate&sortOrder=descending",
            self.search_query(),
            self.offset,
            self.size
        )
    }

    pub fn url(&self, base: &str) -> String {
        format!("{}?{}", base.trim_end_matches('?'), self.query_string())
    }
}
