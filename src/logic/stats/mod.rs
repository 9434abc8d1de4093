//! Stats Module
//!
//! Running counters that survive restarts, plus the monthly recount.
//!
//! ## Structure
//! - `types`: RunningStats, StatsDelta, MonthlySummary
//! - `storage`: JSON persistence (temp file + rename)
//! - `aggregator`: Mutex-guarded owner of the counters

pub mod aggregator;
pub mod storage;
pub mod types;

pub use aggregator::StatsAggregator;
pub use storage::{load_stats, save_stats};
pub use types::{MonthlySummary, RunningStats, StatsDelta};

#[cfg(test)]
mod tests;
