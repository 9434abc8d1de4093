//! Fraud Event Logger
//!
//! Append-only JSONL partitions, one file per event type and month:
//! `<log_dir>/<type>-<YYYY-MM>.jsonl`.
//! A single mutex serializes appends, so records never interleave.
//! Each append opens its partition, so a clear from another process is
//! picked up by the next record. A bounded ring of recent events sits
//! next to the durable log and only holds events that reached disk.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use crate::logic::client::ClientContext;
use crate::logic::config::FraudConfig;
use crate::logic::error::ShieldResult;
use super::event::{EventType, FraudEvent};

/// Log file extension
const LOG_EXT: &str = "jsonl";

// ============================================================================
// PARTITIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PartitionKey {
    pub event_type: EventType,
    /// `YYYY-MM`
    pub month: String,
}

impl PartitionKey {
    pub fn file_name(&self) -> String {
        format!("{}-{}.{}", self.event_type.as_str(), self.month, LOG_EXT)
    }

    /// Inverse of `file_name`
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(&format!(".{}", LOG_EXT))?;
        let (kind, month) = stem.split_once('-')?;
        let event_type = kind.parse().ok()?;
        if month.len() != 7 {
            return None;
        }
        Some(Self {
            event_type,
            month: month.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PartitionInfo {
    pub key: PartitionKey,
    pub path: PathBuf,
    pub size_bytes: u64,
}

// ============================================================================
// LOGGER
// ============================================================================

pub struct EventLogger {
    log_dir: PathBuf,
    capacity: usize,
    events_logged: AtomicU64,
    recent: Mutex<VecDeque<FraudEvent>>,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            log_dir: log_dir.into(),
            capacity: capacity.max(1),
            events_logged: AtomicU64::new(0),
            recent: Mutex::new(VecDeque::new()),
        }
    }

    pub fn from_config(config: &FraudConfig) -> Self {
        Self::new(config.log_dir(), config.recent_events_capacity)
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Events appended since construction
    pub fn events_logged(&self) -> u64 {
        self.events_logged.load(Ordering::SeqCst)
    }

    /// Build and append an event. Write failures are logged, never returned;
    /// `None` means the record did not reach disk.
    pub fn log(&self, event_type: EventType, client: &ClientContext, payload: Value) -> Option<FraudEvent> {
        let event = FraudEvent::new(event_type, client, payload);
        match self.append(&event) {
            Ok(()) => Some(event),
            Err(e) => {
                log::error!("Failed to log {} event: {}", event_type, e);
                None
            }
        }
    }

    /// Append one record to its partition, then to the recent ring
    pub fn append(&self, event: &FraudEvent) -> ShieldResult<()> {
        let line = event.to_jsonl()?;
        let key = PartitionKey {
            event_type: event.event_type,
            month: event.month_key(),
        };

        let mut recent = self.recent.lock();

        let mut writer = self.open_partition(&key)?;
        // Line + newline in one buffer so a failed flush never splits a record
        let mut record = line.into_bytes();
        record.push(b'\n');
        writer.write_all(&record)?;
        writer.flush()?;

        if recent.len() >= self.capacity {
            recent.pop_front();
        }
        recent.push_back(event.clone());

        self.events_logged.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn open_partition(&self, key: &PartitionKey) -> ShieldResult<BufWriter<File>> {
        fs::create_dir_all(&self.log_dir)?;
        let path = self.log_dir.join(key.file_name());
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(BufWriter::new(file))
    }

    pub fn partition_path(&self, event_type: EventType, month: &str) -> PathBuf {
        let key = PartitionKey {
            event_type,
            month: month.to_string(),
        };
        self.log_dir.join(key.file_name())
    }

    /// Remove all partitions, or those of one type. Returns partitions removed.
    pub fn clear(&self, event_type: Option<EventType>) -> ShieldResult<usize> {
        let mut recent = self.recent.lock();

        let mut removed = 0;
        for info in self.scan_partitions()? {
            if event_type.map_or(true, |t| info.key.event_type == t) {
                fs::remove_file(&info.path)?;
                removed += 1;
            }
        }

        match event_type {
            None => recent.clear(),
            Some(t) => recent.retain(|e| e.event_type != t),
        }

        log::info!(
            "Cleared {} log partition(s) ({})",
            removed,
            event_type.map_or("all", |t| t.as_str())
        );
        Ok(removed)
    }

    /// Events of one partition in insertion order; missing partition is empty
    pub fn read_partition(&self, event_type: EventType, month: &str) -> ShieldResult<Vec<FraudEvent>> {
        let path = self.partition_path(event_type, month);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&path)?);
        let mut events = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<FraudEvent>(&line) {
                Ok(event) => events.push(event),
                Err(e) => log::warn!("Skipping unreadable record in {:?}: {}", path, e),
            }
        }
        Ok(events)
    }

    /// Record count of one partition
    pub fn count_partition(&self, event_type: EventType, month: &str) -> ShieldResult<usize> {
        let path = self.partition_path(event_type, month);
        if !path.exists() {
            return Ok(0);
        }

        let reader = BufReader::new(File::open(&path)?);
        let mut count = 0;
        for line in reader.lines() {
            if !line?.trim().is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn list_partitions(&self) -> ShieldResult<Vec<PartitionInfo>> {
        let _guard = self.recent.lock();
        self.scan_partitions()
    }

    fn scan_partitions(&self) -> ShieldResult<Vec<PartitionInfo>> {
        let mut partitions = Vec::new();
        if !self.log_dir.is_dir() {
            return Ok(partitions);
        }

        for entry in fs::read_dir(&self.log_dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some(key) = path.file_name().and_then(|n| n.to_str()).and_then(PartitionKey::parse) else {
                continue;
            };
            let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
            partitions.push(PartitionInfo { key, path, size_bytes });
        }

        partitions.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(partitions)
    }

    /// Newest first
    pub fn recent(&self, limit: usize) -> Vec<FraudEvent> {
        self.recent.lock().iter().rev().take(limit).cloned().collect()
    }

    pub fn recent_len(&self) -> usize {
        self.recent.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::telemetry::event::{current_month, system_payload};
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    fn client() -> ClientContext {
        ClientContext::new("81.2.69.142", "Mozilla/5.0 test")
    }

    #[test]
    fn test_log_appends_to_month_partition() {
        let dir = tempdir().unwrap();
        let logger = EventLogger::new(dir.path(), 10);

        logger.log(EventType::Honeypot, &client(), json!({"quantity": 1}));
        logger.log(EventType::Honeypot, &client(), json!({"quantity": 2}));
        logger.log(EventType::OrderAnalysis, &client(), json!({"risk_score": 5}));

        let month = current_month();
        let path = dir.path().join(format!("honeypot-{}.jsonl", month));
        assert!(path.exists());

        let events = logger.read_partition(EventType::Honeypot, &month).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].payload["quantity"], 1);
        assert_eq!(events[1].payload["quantity"], 2);
        assert_eq!(logger.count_partition(EventType::OrderAnalysis, &month).unwrap(), 1);
        assert_eq!(logger.list_partitions().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_write_stays_out_of_ring() {
        let dir = tempdir().unwrap();
        // A plain file where the log directory should be
        let blocked = dir.path().join("logs");
        fs::write(&blocked, "not a directory").unwrap();
        let logger = EventLogger::new(&blocked, 10);

        assert!(logger.log(EventType::System, &client(), system_payload("x")).is_none());
        assert!(logger.recent(10).is_empty());
        assert_eq!(logger.events_logged(), 0);
    }

    #[test]
    fn test_clear_from_another_logger_is_seen() {
        let dir = tempdir().unwrap();
        let writer = EventLogger::new(dir.path(), 10);
        let admin = EventLogger::new(dir.path(), 10);
        let month = current_month();

        writer.log(EventType::Honeypot, &client(), json!({ "n": 1 }));
        assert_eq!(admin.clear(Some(EventType::Honeypot)).unwrap(), 1);

        writer.log(EventType::Honeypot, &client(), json!({ "n": 2 }));
        let events = admin.read_partition(EventType::Honeypot, &month).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload["n"], 2);
    }

    #[test]
    fn test_ring_is_bounded_and_newest_first() {
        let dir = tempdir().unwrap();
        let logger = EventLogger::new(dir.path(), 3);

        for i in 0..5 {
            logger.log(EventType::System, &client(), json!({ "n": i }));
        }

        let recent = logger.recent(10);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].payload["n"], 4);
        assert_eq!(recent[2].payload["n"], 2);
        assert_eq!(logger.recent(1).len(), 1);

        // Durable log keeps everything
        assert_eq!(logger.count_partition(EventType::System, &current_month()).unwrap(), 5);
    }

    #[test]
    fn test_clear_one_type_keeps_others() {
        let dir = tempdir().unwrap();
        let logger = EventLogger::new(dir.path(), 50);

        logger.log(EventType::Honeypot, &client(), json!({}));
        logger.log(EventType::OrderAnalysis, &client(), json!({}));
        logger.log(EventType::System, &client(), json!({}));

        // An older honeypot partition written by a previous month
        fs::write(dir.path().join("honeypot-2020-01.jsonl"), "{}\n").unwrap();

        let removed = logger.clear(Some(EventType::Honeypot)).unwrap();
        assert_eq!(removed, 2);

        let left = logger.list_partitions().unwrap();
        assert_eq!(left.len(), 2);
        assert!(left.iter().all(|p| p.key.event_type != EventType::Honeypot));
        assert!(logger.recent(50).iter().all(|e| e.event_type != EventType::Honeypot));
        assert_eq!(logger.recent_len(), 2);

        // Logging after a clear reopens the partition
        logger.log(EventType::Honeypot, &client(), json!({}));
        assert_eq!(logger.count_partition(EventType::Honeypot, &current_month()).unwrap(), 1);
    }

    #[test]
    fn test_clear_all_empties_ring() {
        let dir = tempdir().unwrap();
        let logger = EventLogger::new(dir.path(), 50);

        logger.log(EventType::Honeypot, &client(), json!({}));
        logger.log(EventType::HighRiskAlert, &client(), json!({}));

        assert_eq!(logger.clear(None).unwrap(), 2);
        assert!(logger.recent(50).is_empty());
        assert!(logger.list_partitions().unwrap().is_empty());
        assert_eq!(logger.clear(None).unwrap(), 0);
    }

    #[test]
    fn test_concurrent_appends_stay_whole() {
        let dir = tempdir().unwrap();
        let logger = Arc::new(EventLogger::new(dir.path(), 10));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for i in 0..25 {
                        logger.log(EventType::OrderAnalysis, &client(), json!({ "t": t, "i": i }));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let events = logger.read_partition(EventType::OrderAnalysis, &current_month()).unwrap();
        assert_eq!(events.len(), 200);
        assert_eq!(logger.events_logged(), 200);
    }

    #[test]
    fn test_partition_key_parse() {
        let key = PartitionKey::parse("high_risk_alert-2026-10.jsonl").unwrap();
        assert_eq!(key.event_type, EventType::HighRiskAlert);
        assert_eq!(key.month, "2026-10");
        assert!(PartitionKey::parse("stats.json").is_none());
        assert!(PartitionKey::parse("unknown-2026-10.jsonl").is_none());
    }
}
