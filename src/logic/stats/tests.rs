use std::fs;
use std::sync::Arc;
use std::thread;

use serde_json::json;
use tempfile::tempdir;

use crate::logic::client::ClientContext;
use crate::logic::telemetry::{EventLogger, EventType};
use super::*;

#[test]
fn test_record_persists_every_mutation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.json");
    let agg = StatsAggregator::new(&path);

    agg.record(StatsDelta::detection().with_fee(9999.0));
    agg.record(StatsDelta::alert());

    let restored = StatsAggregator::load(&path).snapshot();
    assert_eq!(restored.honeypot_detections, 1);
    assert_eq!(restored.security_fees_applied, 1);
    assert_eq!(restored.total_amount_protected, 9999.0);
    assert_eq!(restored.alerts_sent, 1);
    assert!(restored.last_updated.is_some());
}

#[test]
fn test_missing_or_corrupt_file_starts_at_zero() {
    let dir = tempdir().unwrap();
    let missing = StatsAggregator::load(dir.path().join("none.json"));
    assert_eq!(missing.snapshot(), RunningStats::default());

    let corrupt = dir.path().join("stats.json");
    fs::write(&corrupt, b"{ not json").unwrap();
    assert_eq!(StatsAggregator::load(&corrupt).snapshot(), RunningStats::default());
}

#[test]
fn test_noop_delta_does_not_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.json");
    let agg = StatsAggregator::new(&path);

    agg.record(StatsDelta::default());
    assert!(!path.exists());
}

#[test]
fn test_concurrent_increments_lose_nothing() {
    let dir = tempdir().unwrap();
    let agg = Arc::new(StatsAggregator::new(dir.path().join("stats.json")));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let agg = Arc::clone(&agg);
            thread::spawn(move || {
                for _ in 0..50 {
                    agg.record(StatsDelta::detection().with_fee(1.0));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let stats = agg.snapshot();
    assert_eq!(stats.honeypot_detections, 400);
    assert_eq!(stats.security_fees_applied, 400);
    assert_eq!(stats.total_amount_protected, 400.0);

    let on_disk = StatsAggregator::load(agg.path()).snapshot();
    assert_eq!(on_disk.honeypot_detections, 400);
}

#[test]
fn test_reset_zeroes_and_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.json");
    let agg = StatsAggregator::new(&path);
    agg.record(StatsDelta::alert());

    agg.reset().unwrap();
    assert_eq!(agg.snapshot().alerts_sent, 0);
    assert_eq!(StatsAggregator::load(&path).snapshot().alerts_sent, 0);
}

#[test]
fn test_monthly_summary_counts_current_partitions() {
    let dir = tempdir().unwrap();
    let logger = EventLogger::new(dir.path().join("logs"), 5);
    let agg = StatsAggregator::new(dir.path().join("stats.json"));
    let client = ClientContext::new("81.2.69.142", "Mozilla/5.0");

    for i in 0..7 {
        logger.log(EventType::Honeypot, &client, json!({ "n": i }));
    }
    for _ in 0..3 {
        logger.log(EventType::OrderAnalysis, &client, json!({}));
    }
    // Previous months are not counted
    fs::write(dir.path().join("logs").join("honeypot-2020-01.jsonl"), "{}\n{}\n").unwrap();

    let summary = agg.monthly_summary(&logger).unwrap();
    assert_eq!(summary.honeypot, 7);
    assert_eq!(summary.order_analysis, 3);
    assert_eq!(summary.high_risk_alert, 0);
    assert_eq!(summary.total(), 10);
}
