use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored summary, keyed by the paper's stable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSummary {
    pub paper_id: String,
    pub content: String,
    pub model_version: String,
    pub generated_at: DateTime<Utc>,
}
