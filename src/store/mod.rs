mod batch_cache;
mod paper_store;

pub use batch_cache::{BatchCache, BatchKey};
pub use paper_store::{Batch, PaperStore};
