//! Stats Aggregator
//!
//! Single owner of `RunningStats`. Every mutation takes the mutex,
//! applies the delta and persists before releasing it.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::logic::error::ShieldResult;
use crate::logic::telemetry::{current_month, EventLogger, EventType};
use super::storage::{load_stats, save_stats};
use super::types::{MonthlySummary, RunningStats, StatsDelta};

pub struct StatsAggregator {
    path: PathBuf,
    stats: Mutex<RunningStats>,
}

impl StatsAggregator {
    /// Fresh counters that persist to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stats: Mutex::new(RunningStats::default()),
        }
    }

    /// Restore counters from `path`. A corrupt file is logged and starts at zero.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stats = match load_stats(&path) {
            Ok(stats) => stats,
            Err(e) => {
                log::error!("Failed to load stats from {:?}, starting at zero: {}", path, e);
                RunningStats::default()
            }
        };
        Self {
            path,
            stats: Mutex::new(stats),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply one delta and persist. Returns the counters after the update.
    pub fn record(&self, delta: StatsDelta) -> RunningStats {
        if delta.is_noop() {
            return self.snapshot();
        }

        let mut stats = self.stats.lock();
        stats.apply(&delta);
        if let Err(e) = save_stats(&stats, &self.path) {
            log::error!("Failed to persist stats to {:?}: {}", self.path, e);
        }
        stats.clone()
    }

    pub fn snapshot(&self) -> RunningStats {
        self.stats.lock().clone()
    }

    /// Administrative reset: zero everything and persist
    pub fn reset(&self) -> ShieldResult<()> {
        let mut stats = self.stats.lock();
        *stats = RunningStats::default();
        save_stats(&stats, &self.path)?;
        log::warn!("Running stats reset");
        Ok(())
    }

    /// Recount this month's events from the log partitions
    pub fn monthly_summary(&self, logger: &EventLogger) -> ShieldResult<MonthlySummary> {
        let month = current_month();
        Ok(MonthlySummary {
            honeypot: logger.count_partition(EventType::Honeypot, &month)?,
            order_analysis: logger.count_partition(EventType::OrderAnalysis, &month)?,
            high_risk_alert: logger.count_partition(EventType::HighRiskAlert, &month)?,
            system: logger.count_partition(EventType::System, &month)?,
            month,
        })
    }
}
