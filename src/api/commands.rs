//! Admin Commands
//!
//! Statistics, monthly summary, recent events, log clearing, settings,
//! stats reset and a status snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{APP_NAME, APP_VERSION};
use crate::logic::config::{FraudConfig, SettingsUpdate};
use crate::logic::error::{ShieldError, ShieldResult};
use crate::logic::shield::FraudShield;
use crate::logic::stats::{MonthlySummary, RunningStats};
use crate::logic::telemetry::{EventType, FraudEvent};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Everything the dashboard header shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldStatus {
    pub name: String,
    pub version: String,
    pub enabled: bool,
    pub alert_threshold: u8,
    pub auto_security_fee: bool,
    pub email_alerts: bool,
    pub log_all_attempts: bool,
    pub alert_transport: String,
    pub started_at: DateTime<Utc>,
    pub events_logged: u64,
    pub recent_events: usize,
    pub log_partitions: usize,
    pub stats: RunningStats,
}

/// Recent event row for the live debug panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRow {
    pub id: String,
    pub timestamp: String,
    pub event_type: String,
    pub client_ip: String,
    pub summary: String,
}

impl From<&FraudEvent> for EventRow {
    fn from(event: &FraudEvent) -> Self {
        let summary = match event.event_type {
            EventType::Honeypot => format!(
                "product {} x{}",
                event.payload["product_id"],
                event.payload["quantity"]
            ),
            EventType::OrderAnalysis => format!(
                "score {} ({})",
                event.payload["risk_score"],
                event.payload["risk_level"].as_str().unwrap_or("?")
            ),
            EventType::HighRiskAlert => event.payload["subject"].as_str().unwrap_or_default().to_string(),
            EventType::System => event.payload["message"].as_str().unwrap_or_default().to_string(),
        };

        Self {
            id: event.id.to_string(),
            timestamp: event.timestamp.to_rfc3339(),
            event_type: event.event_type.as_str().to_string(),
            client_ip: event.client_ip.clone(),
            summary,
        }
    }
}

// ============================================================================
// READ COMMANDS
// ============================================================================

pub fn get_statistics(shield: &FraudShield) -> RunningStats {
    shield.stats().snapshot()
}

/// This month's counts, recounted from the log
pub fn get_monthly_summary(shield: &FraudShield) -> ShieldResult<MonthlySummary> {
    shield.stats().monthly_summary(shield.logger())
}

/// Newest first
pub fn get_recent_events(shield: &FraudShield, limit: usize) -> Vec<EventRow> {
    shield.logger().recent(limit).iter().map(EventRow::from).collect()
}

pub fn get_status(shield: &FraudShield) -> ShieldResult<ShieldStatus> {
    let config = shield.config();
    let logger = shield.logger();

    Ok(ShieldStatus {
        name: APP_NAME.to_string(),
        version: APP_VERSION.to_string(),
        enabled: config.enabled,
        alert_threshold: config.alert_threshold,
        auto_security_fee: config.auto_security_fee,
        email_alerts: config.email_alerts,
        log_all_attempts: config.log_all_attempts,
        alert_transport: shield.transport_name().to_string(),
        started_at: shield.started_at(),
        events_logged: logger.events_logged(),
        recent_events: logger.recent_len(),
        log_partitions: logger.list_partitions()?.len(),
        stats: shield.stats().snapshot(),
    })
}

// ============================================================================
// WRITE COMMANDS
// ============================================================================

/// Clear all logs, or one type by name. Returns partitions removed.
pub fn clear_logs(shield: &FraudShield, event_type: Option<&str>) -> ShieldResult<usize> {
    let parsed = match event_type {
        Some(name) => Some(name.parse::<EventType>().map_err(ShieldError::InvalidConfig)?),
        None => None,
    };
    shield.logger().clear(parsed)
}

pub fn update_settings(shield: &FraudShield, update: &SettingsUpdate) -> ShieldResult<FraudConfig> {
    shield.update_settings(update)
}

pub fn reset_statistics(shield: &FraudShield) -> ShieldResult<RunningStats> {
    shield.stats().reset()?;
    Ok(shield.stats().snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::alert::MemoryTransport;
    use crate::logic::client::ClientContext;
    use crate::logic::honeypot::{CartSnapshot, CheckoutCycle};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn shield(dir: &TempDir) -> FraudShield {
        FraudShield::new(
            FraudConfig::with_data_dir(dir.path()),
            Arc::new(MemoryTransport::new()),
        )
        .unwrap()
    }

    fn trigger(shield: &FraudShield) {
        let mut cart = CartSnapshot::default().with_item(604098, 1, 1.0);
        shield.on_cart_recalculated(
            &mut cart,
            &ClientContext::new("81.2.69.142", "Mozilla/5.0 (test)"),
            &mut CheckoutCycle::begin(),
        );
    }

    #[test]
    fn test_status_and_summary() {
        let dir = TempDir::new().unwrap();
        let shield = shield(&dir);
        trigger(&shield);

        let status = get_status(&shield).unwrap();
        assert!(status.enabled);
        assert_eq!(status.alert_transport, "memory");
        assert_eq!(status.stats.honeypot_detections, 1);
        // honeypot, high_risk_alert
        assert_eq!(status.log_partitions, 2);

        let summary = get_monthly_summary(&shield).unwrap();
        assert_eq!(summary.honeypot, 1);
        assert_eq!(summary.high_risk_alert, 1);
    }

    #[test]
    fn test_recent_events_newest_first() {
        let dir = TempDir::new().unwrap();
        let shield = shield(&dir);
        trigger(&shield);

        let rows = get_recent_events(&shield, 10);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event_type, "high_risk_alert");
        assert_eq!(rows[1].event_type, "honeypot");
        assert_eq!(rows[1].summary, "product 604098 x1");
    }

    #[test]
    fn test_read_only_commands_leave_logs_alone() {
        let dir = TempDir::new().unwrap();
        let shield = shield(&dir);

        get_status(&shield).unwrap();
        get_statistics(&shield);
        get_monthly_summary(&shield).unwrap();
        assert!(get_recent_events(&shield, 10).is_empty());

        assert!(shield.logger().list_partitions().unwrap().is_empty());
        assert_eq!(shield.logger().events_logged(), 0);
    }

    #[test]
    fn test_clear_logs_by_name() {
        let dir = TempDir::new().unwrap();
        let shield = shield(&dir);
        trigger(&shield);

        assert_eq!(clear_logs(&shield, Some("honeypot")).unwrap(), 1);
        assert!(matches!(clear_logs(&shield, Some("bogus")), Err(ShieldError::InvalidConfig(_))));
        assert_eq!(clear_logs(&shield, None).unwrap(), 1);
        assert!(get_recent_events(&shield, 10).is_empty());
    }

    #[test]
    fn test_reset_statistics() {
        let dir = TempDir::new().unwrap();
        let shield = shield(&dir);
        trigger(&shield);

        let stats = reset_statistics(&shield).unwrap();
        assert_eq!(stats.honeypot_detections, 0);
        assert_eq!(get_statistics(&shield).alerts_sent, 0);
    }
}
