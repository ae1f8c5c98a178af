use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    AsyncDatabase(#[from] tokio_rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    FeedParse(#[from] feed_rs::parser::ParseFeedError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Paper not found: {0}")]
    PaperNotFound(usize),

    #[error("No PDF URL available for paper {0}")]
    NoPdfLink(String),

    #[error("Could not download or extract text from PDF: {0}")]
    ExtractionFailed(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of a failed request, used by callers that need to
/// report "not found" differently from "could not extract" or "model failed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Extraction,
    Inference,
    InvalidRequest,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::PaperNotFound(_) | AppError::NoPdfLink(_) => FailureKind::NotFound,
            AppError::ExtractionFailed(_) => FailureKind::Extraction,
            AppError::Inference(_) => FailureKind::Inference,
            AppError::UnknownTopic(_) | AppError::InvalidRequest(_) => FailureKind::InvalidRequest,
            _ => FailureKind::Internal,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::NotFound => "not found",
            FailureKind::Extraction => "extraction failed",
            FailureKind::Inference => "inference failed",
            FailureKind::InvalidRequest => "invalid request",
            FailureKind::Internal => "internal error",
        };
        f.write_str(label)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
