use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;

use super::query::FeedQuery;
use crate::error::Result;
use crate::models::NO_DATE;

/// Timestamp layout used by the feed API.
pub const SOURCE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryLink {
    pub href: String,
    pub rel: Option<String>,
    pub media_type: Option<String>,
}

/// A feed entry as the source delivered it, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub links: Vec<EntryLink>,
    pub published: String,
}

impl From<feed_rs::model::Entry> for FeedEntry {
    fn from(entry: feed_rs::model::Entry) -> Self {
        let published = entry
            .published
            .or(entry.updated)
            .map(|dt| dt.format(SOURCE_TIME_FORMAT).to_string())
            .unwrap_or_else(|| NO_DATE.to_string());

        FeedEntry {
            id: entry.id,
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            summary: entry.summary.map(|s| s.content).unwrap_or_default(),
            links: entry
                .links
                .into_iter()
                .map(|l| EntryLink {
                    href: l.href,
                    rel: l.rel,
                    media_type: l.media_type,
                })
                .collect(),
            published,
        }
    }
}

/// Anything that can answer a paginated topic query with raw entries.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<FeedEntry>>;
}

pub struct ArxivClient {
    client: Client,
    base_url: String,
}

impl ArxivClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("paper-digest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn parse_entries(bytes: &[u8]) -> Result<Vec<FeedEntry>> {
        let feed = parser::parse(bytes)?;
        Ok(feed.entries.into_iter().map(FeedEntry::from).collect())
    }
}

#[async_trait]
impl FeedSource for ArxivClient {
    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<FeedEntry>> {
        let url = query.url(&self.base_url);
        tracing::debug!(%url, "Querying feed");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Failed to fetch feed: HTTP {}", response.status()).into());
        }

        let bytes = response.bytes().await?;
        let entries = Self::parse_entries(&bytes)?;
        tracing::info!(
            topic = query.filter.label(),
            offset = query.offset,
            count = entries.len(),
            "Fetched feed page"
        );
        Ok(entries)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::feed::topics::TopicFilter;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) const ATOM_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query</title>
  <id>http://arxiv.org/api/query</id>
  <updated>2025-04-11T00:00:00-04:00</updated>
  <entry>
    <id>http://arxiv.org/abs/2504.08001v1</id>
    <updated>2025-04-11T06:42:00Z</updated>
    <published>2025-04-11T06:42:00Z</published>
    <title>Offline Reinforcement Learning
  with Transformers</title>
    <summary>  We study reinforcement learning from logged data.
</summary>
    <author><name>A. Author</name></author>
    <link href="http://arxiv.org/abs/2504.08001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2504.08001v1" rel="related" type="application/pdf"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2504.07002v2</id>
    <updated>2025-04-10T15:00:00Z</updated>
    <published>2025-04-10T15:00:00Z</published>
    <title>Digital Twin Calibration</title>
    <summary>Calibrating a digital twin of a factory floor.</summary>
    <author><name>B. Author</name></author>
    <link href="http://arxiv.org/abs/2504.07002v2" rel="alternate" type="text/html"/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_atom_entries() {
        let entries = ArxivClient::parse_entries(ATOM_FIXTURE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.id, "http://arxiv.org/abs/2504.08001v1");
        assert_eq!(first.published, "2025-04-11T06:42:00Z");
        assert!(first.title.contains("Offline Reinforcement Learning"));
        assert!(first
            .links
            .iter()
            .any(|l| l.media_type.as_deref() == Some("application/pdf")));

        assert_eq!(entries[1].links.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_sends_paging_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .and(query_param("start", "100"))
            .and(query_param("max_results", "100"))
            .and(query_param("sortBy", "submittedDate"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ATOM_FIXTURE))
            .expect(1)
            .mount(&server)
            .await;

        let client = ArxivClient::new(format!("{}/api/query", server.uri())).unwrap();
        let query = FeedQuery::for_page(TopicFilter::All, 2, 100).unwrap();
        let entries = client.fetch(&query).await.unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_reports_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ArxivClient::new(format!("{}/api/query", server.uri())).unwrap();
        let query = FeedQuery::new(TopicFilter::All, 0, 10);
        assert!(client.fetch(&query).await.is_err());
    }
}
