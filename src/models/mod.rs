mod paper;
mod summary;

pub use paper::{group_by_day, DayGroup, Paper, Published, NO_DATE};
pub use summary::GeneratedSummary;
