//! Alert Dispatcher
//!
//! Decides whether an alert is due and hands the payload to the transport.
//! With alerts switched off a due alert is still built, just never sent.
//! Delivery failures are logged here and never travel further.

use crate::logic::client::ClientContext;
use crate::logic::config::FraudConfig;
use crate::logic::honeypot::{AppliedFee, HoneypotDetection};
use crate::logic::risk::RiskAssessment;
use super::transport::AlertTransport;
use super::types::AlertPayload;

#[derive(Debug, Clone)]
pub struct AlertDispatcher {
    threshold: u8,
    enabled: bool,
    site_name: String,
    recipient: Option<String>,
}

impl AlertDispatcher {
    pub fn new(threshold: u8, enabled: bool, site_name: &str) -> Self {
        Self {
            threshold,
            enabled,
            site_name: site_name.to_string(),
            recipient: None,
        }
    }

    pub fn from_config(config: &FraudConfig) -> Self {
        Self {
            threshold: config.alert_threshold,
            enabled: config.email_alerts,
            site_name: config.site_name.clone(),
            recipient: config.alert_recipient.clone(),
        }
    }

    pub fn with_recipient(mut self, recipient: &str) -> Self {
        self.recipient = Some(recipient.to_string());
        self
    }

    pub fn crosses_threshold(&self, score: u8) -> bool {
        score >= self.threshold
    }

    /// Payload for a scored order, `None` below the threshold
    pub fn for_assessment(&self, assessment: &RiskAssessment, client: &ClientContext) -> Option<AlertPayload> {
        if !self.crosses_threshold(assessment.score) {
            return None;
        }
        Some(AlertPayload::high_risk(
            &self.site_name,
            self.recipient.clone(),
            assessment,
            client,
        ))
    }

    /// Every honeypot trigger raises an alert, regardless of threshold
    pub fn for_honeypot(
        &self,
        trigger: &HoneypotDetection,
        fee: Option<&AppliedFee>,
        client: &ClientContext,
    ) -> Option<AlertPayload> {
        if !trigger.detected {
            return None;
        }
        Some(AlertPayload::honeypot(
            &self.site_name,
            self.recipient.clone(),
            trigger,
            fee,
            client,
        ))
    }

    /// True only when the transport accepted the alert
    pub fn deliver(&self, payload: &AlertPayload, transport: &dyn AlertTransport) -> bool {
        if !self.enabled {
            log::debug!("Alerts off, '{}' not sent", payload.subject);
            return false;
        }
        match transport.send(payload) {
            Ok(()) => {
                log::info!("Alert '{}' delivered via {}", payload.subject, transport.name());
                true
            }
            Err(e) => {
                log::error!("Alert '{}' not delivered via {}: {}", payload.subject, transport.name(), e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::alert::{AlertClass, MemoryTransport};
    use crate::logic::risk::RiskLevel;

    fn assessment(score: u8) -> RiskAssessment {
        RiskAssessment {
            score,
            raw_score: score as u32,
            risk_level: RiskLevel::from_score(score),
            ..Default::default()
        }
    }

    fn client() -> ClientContext {
        ClientContext::new("81.2.69.142", &"X".repeat(300))
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let d = AlertDispatcher::new(60, true, "shop.example");
        assert!(d.for_assessment(&assessment(59), &client()).is_none());
        assert!(d.for_assessment(&assessment(60), &client()).is_some());
        assert!(d.for_assessment(&assessment(100), &client()).is_some());
    }

    #[test]
    fn test_disabled_alerts_build_but_never_send() {
        let d = AlertDispatcher::new(1, false, "shop.example");
        let payload = d.for_assessment(&assessment(100), &client()).unwrap();

        let transport = MemoryTransport::new();
        assert!(!d.deliver(&payload, &transport));
        assert!(transport.is_empty());

        let trigger = HoneypotDetection {
            detected: true,
            product_id: Some(604098),
            quantity: 1,
        };
        assert!(d.for_honeypot(&trigger, None, &client()).is_some());
    }

    #[test]
    fn test_payload_format() {
        let d = AlertDispatcher::new(60, true, "shop.example").with_recipient("ops@shop.example");
        let trigger = HoneypotDetection {
            detected: true,
            product_id: Some(604098),
            quantity: 2,
        };
        let fee = AppliedFee {
            product_id: 604098,
            quantity: 2,
            amount: 19998.0,
        };

        let p = d.for_honeypot(&trigger, Some(&fee), &client()).unwrap();
        assert_eq!(p.class, AlertClass::Honeypot);
        assert!(p.subject.contains("shop.example"));
        assert!(p.subject.contains("Honeypot"));
        assert!(p.body.contains("Quantity: 2"));
        assert!(p.body.contains("19998.00"));
        assert!(p.body.contains("81.2.69.142"));
        assert!(p.body.contains(&format!("User-Agent: {}\n", "X".repeat(100))));
        assert!(!p.body.contains(&"X".repeat(101)));
        assert_eq!(p.recipient.as_deref(), Some("ops@shop.example"));

        let p = d.for_assessment(&assessment(85), &client()).unwrap();
        assert!(p.body.contains("85/100 (CRITICAL)"));
        assert_eq!(p.risk_score, Some(85));
    }

    #[test]
    fn test_deliver_reports_transport_outcome() {
        let d = AlertDispatcher::new(60, true, "shop.example");
        let payload = d.for_assessment(&assessment(90), &client()).unwrap();

        let ok = MemoryTransport::new();
        assert!(d.deliver(&payload, &ok));
        assert_eq!(ok.len(), 1);

        let broken = MemoryTransport::failing();
        assert!(!d.deliver(&payload, &broken));
        assert!(broken.is_empty());
    }
}
