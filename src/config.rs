use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::error::{AppError, Result};

pub const DEFAULT_PROMPT: &str = "Provide a concise 2-3 sentence summary of the following research paper content, \
highlighting its key contributions, novelty, and potential impact:";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_timezone")]
    pub display_timezone: String,

    #[serde(default = "default_pdf_timeout")]
    pub pdf_timeout_secs: u64,

    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    #[serde(default)]
    pub inference: InferenceConfig,

    #[serde(default)]
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_endpoint")]
    pub endpoint: String,

    pub api_token: Option<String>,

    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_min_length")]
    pub min_length: u32,

    #[serde(default = "default_max_length")]
    pub max_length: u32,

    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paper-digest");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("summaries.db").to_string_lossy().to_string()
}

fn default_feed_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

fn default_pdf_timeout() -> u64 {
    30
}

fn default_max_input_chars() -> usize {
    5000
}

fn default_inference_endpoint() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_model() -> String {
    "sshleifer/distilbart-cnn-12-6".to_string()
}

fn default_inference_timeout() -> u64 {
    120
}

fn default_min_length() -> u32 {
    80
}

fn default_max_length() -> u32 {
    300
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_inference_endpoint(),
            api_token: None,
            default_model: default_model(),
            timeout_secs: default_inference_timeout(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
            prompt: default_prompt(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            feed_url: default_feed_url(),
            page_size: default_page_size(),
            cache_ttl_secs: default_cache_ttl(),
            display_timezone: default_timezone(),
            pdf_timeout_secs: default_pdf_timeout(),
            max_input_chars: default_max_input_chars(),
            inference: InferenceConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("paper-digest")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(AppError::Config("page_size must be at least 1".to_string()));
        }
        if self.pdf_timeout_secs == 0 {
            return Err(AppError::Config("pdf_timeout_secs must be at least 1".to_string()));
        }
        if self.max_input_chars == 0 {
            return Err(AppError::Config("max_input_chars must be at least 1".to_string()));
        }
        if self.summary.min_length > self.summary.max_length {
            return Err(AppError::Config(format!(
                "summary.min_length ({}) exceeds summary.max_length ({})",
                self.summary.min_length, self.summary.max_length
            )));
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz> {
        Tz::from_str(&self.display_timezone)
            .map_err(|_| AppError::Config(format!("unknown timezone: {}", self.display_timezone)))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }

    /// Token from the config file, or `HF_API_TOKEN` when the file leaves it unset.
    pub fn api_token(&self) -> Option<String> {
        self.inference
            .api_token
            .clone()
            .or_else(|| std::env::var("HF_API_TOKEN").ok())
            .filter(|t| !t.trim().is_empty())
    }
}
