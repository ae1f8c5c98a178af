mod ledger;
mod repository;
mod schema;

pub use ledger::{ProducedSummary, SummaryLedger};
pub use repository::Repository;
