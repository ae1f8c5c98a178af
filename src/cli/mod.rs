mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use paper_digest::ai::SummaryRequest;
use paper_digest::{Config, FetchRequest};

pub use render::{render_batch, render_summary, render_topics};

#[derive(Debug, Parser)]
#[command(name = "paper-digest", version, about = "Browse tagged arXiv papers and summarize them on demand")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List a page of papers grouped by day
    List(PageArgs),

    /// Summarize the full text of a paper from a page
    Summarize {
        /// Paper id as shown by `list`
        id: usize,

        #[command(flatten)]
        page: PageArgs,

        #[arg(long)]
        min_length: Option<u32>,

        #[arg(long)]
        max_length: Option<u32>,

        /// Inference model identifier
        #[arg(long)]
        model: Option<String>,

        /// Instruction placed before the paper text
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Open a paper's PDF in the browser
    Open {
        id: usize,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show the topic vocabulary
    Topics,
}

#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Topic filter, or "all"
    #[arg(long, default_value = "all")]
    pub topic: String,

    /// 1-based page number
    #[arg(long, default_value = "1", value_parser = parse_page)]
    pub page: usize,

    /// Papers per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl PageArgs {
    pub fn fetch_request(&self, config: &Config) -> FetchRequest {
        FetchRequest::new(
            self.topic.clone(),
            self.page,
            self.page_size.unwrap_or(config.page_size),
        )
    }
}

pub fn summary_request(
    min_length: Option<u32>,
    max_length: Option<u32>,
    model: Option<String>,
    prompt: Option<String>,
) -> SummaryRequest {
    SummaryRequest {
        min_length,
        max_length,
        model,
        prompt,
    }
}

/// Anything that is not a positive integer means the first page.
fn parse_page(value: &str) -> Result<usize, String> {
    Ok(value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|p| *p > 0)
        .unwrap_or(1))
}
