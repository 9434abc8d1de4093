use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running counters shared by every request.
/// Only `StatsAggregator` mutates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunningStats {
    pub honeypot_detections: u64,
    pub security_fees_applied: u64,
    pub total_amount_protected: f64,
    pub alerts_sent: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

/// One increment. Fields left at their default change nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsDelta {
    pub detection: bool,
    /// Amount of the fee that was applied
    pub fee_applied: Option<f64>,
    pub alert: bool,
}

impl StatsDelta {
    pub fn detection() -> Self {
        Self {
            detection: true,
            ..Default::default()
        }
    }

    pub fn alert() -> Self {
        Self {
            alert: true,
            ..Default::default()
        }
    }

    pub fn with_fee(mut self, amount: f64) -> Self {
        self.fee_applied = Some(amount);
        self
    }

    pub fn is_noop(&self) -> bool {
        !self.detection && self.fee_applied.is_none() && !self.alert
    }
}

impl RunningStats {
    pub fn apply(&mut self, delta: &StatsDelta) {
        if delta.detection {
            self.honeypot_detections += 1;
        }
        if let Some(amount) = delta.fee_applied {
            self.security_fees_applied += 1;
            // Counters never decrease outside a reset
            if amount.is_finite() && amount > 0.0 {
                self.total_amount_protected += amount;
            }
        }
        if delta.alert {
            self.alerts_sent += 1;
        }
        self.last_updated = Some(Utc::now());
    }
}

/// This month's event counts, recounted from the log on every read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub honeypot: usize,
    pub order_analysis: usize,
    pub high_risk_alert: usize,
    pub system: usize,
}

impl MonthlySummary {
    pub fn total(&self) -> usize {
        self.honeypot + self.order_analysis + self.high_risk_alert + self.system
    }
}
