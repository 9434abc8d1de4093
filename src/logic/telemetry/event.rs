//! Fraud Event Types
//!
//! Immutable, timestamped records for the audit trail.
//! Events are appended, never edited; they only go away in a bulk clear.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::logic::client::ClientContext;
use crate::logic::honeypot::{AppliedFee, CartAnalysis, HoneypotDetection};
use crate::logic::risk::RiskAssessment;

// ============================================================================
// EVENT TYPES
// ============================================================================

/// Categories of fraud events, one log partition family each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Trap product hit during cart recalculation
    Honeypot,
    /// Scored checkout; below the alert threshold only with `log_all_attempts`
    OrderAnalysis,
    /// Alert raised for the operator, delivered or not
    HighRiskAlert,
    System,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::Honeypot,
        EventType::OrderAnalysis,
        EventType::HighRiskAlert,
        EventType::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Honeypot => "honeypot",
            EventType::OrderAnalysis => "order_analysis",
            EventType::HighRiskAlert => "high_risk_alert",
            EventType::System => "system",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .find(|t| t.as_str() == s.trim())
            .copied()
            .ok_or_else(|| format!("unknown event type '{}'", s))
    }
}

// ============================================================================
// FRAUD EVENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub client_ip: String,
    pub user_agent: String,
    pub payload: Value,
}

impl FraudEvent {
    pub fn new(event_type: EventType, client: &ClientContext, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type,
            client_ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
            payload,
        }
    }

    /// Partition month, `YYYY-MM`
    pub fn month_key(&self) -> String {
        month_key(&self.timestamp)
    }

    /// Serialize to a single JSONL line (no trailing newline)
    pub fn to_jsonl(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub fn month_key(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

pub fn current_month() -> String {
    month_key(&Utc::now())
}

// ============================================================================
// PAYLOAD BUILDERS
// ============================================================================

pub fn honeypot_payload(
    trigger: &HoneypotDetection,
    fee: Option<&AppliedFee>,
    analysis: &CartAnalysis,
) -> Value {
    json!({
        "product_id": trigger.product_id,
        "quantity": trigger.quantity,
        "fee_applied": fee.is_some(),
        "fee_amount": fee.map(|f| f.amount),
        "cart_analysis": analysis,
    })
}

pub fn order_analysis_payload(assessment: &RiskAssessment, order_id: Option<u64>) -> Value {
    json!({
        "order_id": order_id,
        "risk_score": assessment.score,
        "raw_score": assessment.raw_score,
        "risk_level": assessment.risk_level,
        "factors": assessment.factor_tags,
        "details": assessment.details,
    })
}

pub fn alert_payload(class: &str, subject: &str, score: Option<u8>, delivered: bool) -> Value {
    json!({
        "alert_class": class,
        "subject": subject,
        "risk_score": score,
        "delivered": delivered,
    })
}

pub fn system_payload(message: &str) -> Value {
    json!({
        "message": message,
        "version": crate::constants::APP_VERSION,
    })
}
