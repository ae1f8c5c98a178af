use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Input for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub min_length: u32,
    pub max_length: u32,
}

/// An inference model seen as a function from prompt and length bounds to text.
/// Implementations must decode deterministically.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    fn model(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
    options: Options,
}

#[derive(Debug, Serialize)]
struct Parameters {
    min_length: u32,
    max_length: u32,
    do_sample: bool,
}

#[derive(Debug, Serialize)]
struct Options {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(alias = "generated_text")]
    summary_text: String,
}

/// Hosted summarization model behind the Hugging Face inference API.
pub struct HuggingFaceBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_token: Option<String>,
}

impl HuggingFaceBackend {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_token,
        })
    }

    fn model_url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.model)
    }
}

#[async_trait]
impl InferenceBackend for HuggingFaceBackend {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = InferenceRequest {
            inputs: &request.prompt,
            parameters: Parameters {
                min_length: request.min_length,
                max_length: request.max_length,
                do_sample: false,
            },
            options: Options {
                wait_for_model: true,
            },
        };

        let mut builder = self.client.post(self.model_url()).json(&body);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Inference(format!("{}: {}", self.model, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Inference(format!(
                "{}: API error {}: {}",
                self.model, status, error_text
            )));
        }

        let candidates: Vec<Candidate> = response
            .json()
            .await
            .map_err(|e| AppError::Inference(format!("{}: malformed response: {}", self.model, e)))?;

        candidates
            .into_iter()
            .next()
            .map(|c| c.summary_text.trim().to_string())
            .ok_or_else(|| AppError::Inference(format!("{}: no candidates returned", self.model)))
    }
}
