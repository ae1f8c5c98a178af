mod fetcher;
mod normalizer;
mod query;
mod topics;

pub use fetcher::{ArxivClient, EntryLink, FeedEntry, FeedSource, SOURCE_TIME_FORMAT};
pub use normalizer::{normalize, normalize_timestamp, stable_id};
pub use query::FeedQuery;
pub use topics::{find_topic, match_tags, Topic, TopicFilter, TOPICS};
