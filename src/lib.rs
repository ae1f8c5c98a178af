//! Topic-tagged arXiv digests with on-demand, memoized full-text summaries.
//!
//! A page view runs the query builder, the feed source and the normalizer,
//! memoizing the result in the batch cache. A summarize request resolves a
//! paper from an explicit batch handle, consults the summary ledger, and only
//! on a miss downloads the PDF and calls the inference backend.

pub mod ai;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod models;
pub mod services;
pub mod store;

pub use app::{App, FetchRequest};
pub use config::Config;
pub use error::{AppError, FailureKind, Result};
