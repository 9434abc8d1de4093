use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ALERT_USER_AGENT_MAX, APP_NAME};
use crate::logic::client::ClientContext;
use crate::logic::honeypot::{AppliedFee, HoneypotDetection};
use crate::logic::risk::RiskAssessment;

// ============================================================================
// ALERT CLASS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertClass {
    /// Scored order at or above the threshold
    HighRisk,
    /// Trap product hit, always notifies
    Honeypot,
}

impl AlertClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertClass::HighRisk => "high_risk",
            AlertClass::Honeypot => "honeypot",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertClass::HighRisk => "High Risk Order Detected",
            AlertClass::Honeypot => "Honeypot Triggered",
        }
    }
}

impl std::fmt::Display for AlertClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ALERT PAYLOAD
// ============================================================================

/// Message handed to the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub class: AlertClass,
    pub subject: String,
    pub body: String,
    pub recipient: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Set for high-risk alerts
    pub risk_score: Option<u8>,
}

impl AlertPayload {
    pub fn subject_for(site_name: &str, class: AlertClass) -> String {
        format!("[{}] {}: {}", site_name, APP_NAME, class.title())
    }

    pub fn high_risk(
        site_name: &str,
        recipient: Option<String>,
        assessment: &RiskAssessment,
        client: &ClientContext,
    ) -> Self {
        let timestamp = Utc::now();
        let mut body = String::new();
        body.push_str("Event: order_analysis\n");
        body.push_str(&format!("Risk score: {}/100 ({})\n", assessment.score, assessment.risk_level));
        if !assessment.factor_tags.is_empty() {
            let tags: Vec<&str> = assessment.factor_tags.iter().map(String::as_str).collect();
            body.push_str(&format!("Factors: {}\n", tags.join(", ")));
        }
        body.push_str(&client_lines(client, &timestamp));

        Self {
            class: AlertClass::HighRisk,
            subject: Self::subject_for(site_name, AlertClass::HighRisk),
            body,
            recipient,
            timestamp,
            risk_score: Some(assessment.score),
        }
    }

    pub fn honeypot(
        site_name: &str,
        recipient: Option<String>,
        trigger: &HoneypotDetection,
        fee: Option<&AppliedFee>,
        client: &ClientContext,
    ) -> Self {
        let timestamp = Utc::now();
        let mut body = String::new();
        body.push_str("Event: honeypot\n");
        if let Some(id) = trigger.product_id {
            body.push_str(&format!("Product: {}\n", id));
        }
        body.push_str(&format!("Quantity: {}\n", trigger.quantity));
        match fee {
            Some(fee) => body.push_str(&format!("Security fee: {:.2}\n", fee.amount)),
            None => body.push_str("Security fee: not applied\n"),
        }
        body.push_str(&client_lines(client, &timestamp));

        Self {
            class: AlertClass::Honeypot,
            subject: Self::subject_for(site_name, AlertClass::Honeypot),
            body,
            recipient,
            timestamp,
            risk_score: None,
        }
    }
}

fn client_lines(client: &ClientContext, timestamp: &DateTime<Utc>) -> String {
    format!(
        "IP: {}\nUser-Agent: {}\nTime: {}\n",
        display_or_unknown(&client.ip),
        display_or_unknown(&truncate_chars(&client.user_agent, ALERT_USER_AGENT_MAX)),
        timestamp.to_rfc3339()
    )
}

fn display_or_unknown(value: &str) -> String {
    if value.trim().is_empty() {
        "unknown".to_string()
    } else {
        value.to_string()
    }
}

/// First `max` characters, never splitting a code point
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
