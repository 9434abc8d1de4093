//! Alert Transports
//!
//! Delivery is somebody else's job; the dispatcher only needs `send`.

use std::time::Duration;

use parking_lot::Mutex;

use crate::logic::error::{ShieldError, ShieldResult};
use super::types::AlertPayload;

pub trait AlertTransport: Send + Sync {
    fn name(&self) -> &'static str;

    fn send(&self, payload: &AlertPayload) -> ShieldResult<()>;
}

// ============================================================================
// LOG TRANSPORT (default)
// ============================================================================

/// Writes alerts to the operational log
#[derive(Debug, Default)]
pub struct LogTransport;

impl AlertTransport for LogTransport {
    fn name(&self) -> &'static str {
        "log"
    }

    fn send(&self, payload: &AlertPayload) -> ShieldResult<()> {
        log::warn!(
            "ALERT {} -> {}\n{}",
            payload.subject,
            payload.recipient.as_deref().unwrap_or("operator"),
            payload.body
        );
        Ok(())
    }
}

// ============================================================================
// WEBHOOK TRANSPORT
// ============================================================================

/// POSTs the payload as JSON
pub struct WebhookTransport {
    url: String,
    agent: ureq::Agent,
}

impl WebhookTransport {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            agent: ureq::AgentBuilder::new().timeout(Duration::from_secs(10)).build(),
        }
    }
}

impl AlertTransport for WebhookTransport {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn send(&self, payload: &AlertPayload) -> ShieldResult<()> {
        let body = serde_json::to_string(payload)?;

        match self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_string(&body)
        {
            Ok(resp) => {
                log::info!("Alert '{}' posted to webhook ({})", payload.subject, resp.status());
                Ok(())
            }
            Err(e) => Err(ShieldError::Transport(e.to_string())),
        }
    }
}

// ============================================================================
// MEMORY TRANSPORT
// ============================================================================

/// Keeps alerts in memory for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<AlertPayload>>,
    fail: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose every delivery fails
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<AlertPayload> {
        self.sent.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AlertTransport for MemoryTransport {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn send(&self, payload: &AlertPayload) -> ShieldResult<()> {
        if self.fail {
            return Err(ShieldError::Transport("delivery refused".to_string()));
        }
        self.sent.lock().push(payload.clone());
        Ok(())
    }
}

/// Webhook when configured, log otherwise
pub fn transport_from_env() -> Box<dyn AlertTransport> {
    match crate::constants::get_alert_webhook() {
        Some(url) => Box::new(WebhookTransport::new(&url)),
        None => Box::new(LogTransport),
    }
}
