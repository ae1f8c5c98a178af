use std::sync::Arc;

use super::backend::GenerationRequest;
use super::registry::ModelRegistry;
use crate::config::{SummaryConfig, DEFAULT_PROMPT};
use crate::error::{AppError, Result};

/// Defaults applied when a request leaves a field unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPolicy {
    pub prompt: String,
    pub min_length: u32,
    pub max_length: u32,
}

impl Default for SummaryPolicy {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            min_length: 80,
            max_length: 300,
        }
    }
}

impl From<&SummaryConfig> for SummaryPolicy {
    fn from(config: &SummaryConfig) -> Self {
        Self {
            prompt: config.prompt.clone(),
            min_length: config.min_length,
            max_length: config.max_length,
        }
    }
}

/// Per-request knobs, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryRequest {
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub model: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutput {
    pub text: String,
    pub model: String,
}

pub struct Summarizer {
    registry: Arc<ModelRegistry>,
    policy: SummaryPolicy,
}

impl Summarizer {
    pub fn new(registry: Arc<ModelRegistry>, policy: SummaryPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn policy(&self) -> &SummaryPolicy {
        &self.policy
    }

    pub fn generation_request(&self, text: &str, request: &SummaryRequest) -> Result<GenerationRequest> {
        let min_length = request.min_length.unwrap_or(self.policy.min_length);
        let max_length = request.max_length.unwrap_or(self.policy.max_length);
        if min_length > max_length {
            return Err(AppError::InvalidRequest(format!(
                "min_length ({}) exceeds max_length ({})",
                min_length, max_length
            )));
        }

        let instruction = request
            .prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(self.policy.prompt.as_str());

        Ok(GenerationRequest {
            prompt: format!("{}\n\n{}", instruction, text),
            min_length,
            max_length,
        })
    }

    pub async fn summarize(&self, text: &str, request: &SummaryRequest) -> Result<SummaryOutput> {
        let generation = self.generation_request(text, request)?;
        let backend = self.registry.get(request.model.as_deref())?;

        tracing::debug!(
            model = backend.model(),
            input_chars = text.chars().count(),
            min_length = generation.min_length,
            max_length = generation.max_length,
            "Generating summary"
        );

        let summary = backend.generate(&generation).await?;
        Ok(SummaryOutput {
            text: summary.trim().to_string(),
            model: backend.model().to_string(),
        })
    }
}
