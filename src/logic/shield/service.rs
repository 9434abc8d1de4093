//! Fraud Shield Service
//!
//! Owns config, logger, stats and the alert transport, and exposes the two
//! checkout entry points. Built once by the host and shared by `Arc`.
//!
//! Every entry point clones the config at its start, so an admin update
//! never changes the rules halfway through a request.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::logic::alert::{self, AlertDispatcher, AlertPayload, AlertTransport};
use crate::logic::client::ClientContext;
use crate::logic::config::{FraudConfig, SettingsUpdate};
use crate::logic::error::ShieldResult;
use crate::logic::honeypot::{self, AppliedFee, Cart, CartAnalysis, CheckoutCycle, FeeApplicator, HoneypotDetection, Notice, NoticeLevel};
use crate::logic::risk::{OrderFacts, OrderSource, RiskAssessment, RiskScorer, ScoringRules};
use crate::logic::stats::{StatsAggregator, StatsDelta};
use crate::logic::telemetry::event::{alert_payload, honeypot_payload, order_analysis_payload, system_payload};
use crate::logic::telemetry::{EventLogger, EventType, FraudEvent};

/// What one cart recalculation did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartOutcome {
    pub detection: HoneypotDetection,
    pub fee: Option<AppliedFee>,
    pub analysis: CartAnalysis,
    pub alert_sent: bool,
}

pub struct FraudShield {
    config: RwLock<FraudConfig>,
    logger: Arc<EventLogger>,
    stats: Arc<StatsAggregator>,
    transport: Arc<dyn AlertTransport>,
    started_at: DateTime<Utc>,
}

impl FraudShield {
    /// Build from an explicit config and transport
    pub fn new(config: FraudConfig, transport: Arc<dyn AlertTransport>) -> ShieldResult<Self> {
        let config = config.validated()?;
        let logger = Arc::new(EventLogger::from_config(&config));
        let stats = Arc::new(StatsAggregator::load(config.stats_path()));

        log::info!(
            "Fraud Shield ready (enabled: {}, threshold: {}, data: {:?}, alerts via {})",
            config.enabled,
            config.alert_threshold,
            config.data_dir,
            transport.name()
        );

        Ok(Self {
            config: RwLock::new(config),
            logger,
            stats,
            transport,
            started_at: Utc::now(),
        })
    }

    /// Load config from `data_dir` (or the environment) and pick the transport from the environment
    pub fn open(data_dir: Option<PathBuf>) -> ShieldResult<Self> {
        let config = FraudConfig::load(data_dir)?;
        Self::new(config, Arc::from(alert::transport_from_env()))
    }

    /// Write the `system` start record. Left to the host so that read-only
    /// tools can open the shield without touching the log.
    pub fn record_startup(&self) -> Option<FraudEvent> {
        self.logger.log(EventType::System, &ClientContext::default(), system_payload("started"))
    }

    // ========================================================================
    // CHECKOUT ENTRY POINTS
    // ========================================================================

    /// Cart recalculation hook.
    ///
    /// Removes the first honeypot line, attaches the fee (when enabled),
    /// records stats, logs and alerts. A trigger already handled in `cycle`
    /// is removed again but nothing else happens.
    pub fn on_cart_recalculated<C: Cart + ?Sized>(
        &self,
        cart: &mut C,
        client: &ClientContext,
        cycle: &mut CheckoutCycle,
    ) -> Option<CartOutcome> {
        let config = self.config();
        if !config.enabled {
            return None;
        }
        let pass = cycle.enter();

        let analysis = honeypot::analyze_cart(&*cart, &config.honeypot_product_ids);
        let detection = honeypot::detect(cart, &config.honeypot_product_ids);
        let product_id = detection.product_id.filter(|_| detection.detected)?;

        if cycle.has_charged(product_id) {
            log::debug!(
                "Honeypot {} already handled in cycle {} (pass {})",
                product_id,
                cycle.token(),
                pass
            );
            return None;
        }

        let fee = if config.auto_security_fee {
            FeeApplicator::from_config(&config).apply(cart, &detection, cycle)
        } else {
            cycle.claim(product_id);
            if cycle.take_notice_slot() {
                cart.add_notice(removal_notice(&analysis));
            }
            None
        };

        log::warn!(
            "Honeypot {} triggered by {} (qty {}, fee {})",
            product_id,
            client.ip,
            detection.quantity,
            fee.as_ref().map_or("none".to_string(), |f| format!("{:.2}", f.amount))
        );

        let mut delta = StatsDelta::detection();
        if let Some(applied) = &fee {
            delta = delta.with_fee(applied.amount);
        }
        self.stats.record(delta);

        self.logger.log(
            EventType::Honeypot,
            client,
            honeypot_payload(&detection, fee.as_ref(), &analysis),
        );

        let dispatcher = AlertDispatcher::from_config(&config);
        let alert_sent = dispatcher
            .for_honeypot(&detection, fee.as_ref(), client)
            .map_or(false, |payload| self.send_alert(&dispatcher, &payload, client));

        Some(CartOutcome {
            detection,
            fee,
            analysis,
            alert_sent,
        })
    }

    /// Order submission hook. Scores, then logs and alerts at or above the
    /// threshold. Below it the order is logged only with `log_all_attempts`.
    pub fn on_order_submitted(&self, source: &OrderSource<'_>, client: &ClientContext) -> Option<RiskAssessment> {
        let config = self.config();
        if !config.enabled {
            return None;
        }

        let facts = OrderFacts::collect(source, client);
        let assessment = RiskScorer::new(ScoringRules::from_config(&config)).score(&facts);
        let order_id = match source {
            OrderSource::Finalized(order) => Some(order.id),
            OrderSource::Submitted { .. } => None,
        };

        log::info!(
            "Order scored {} ({}) for {}",
            assessment.score,
            assessment.risk_level,
            if client.ip.is_empty() { "unknown" } else { client.ip.as_str() }
        );

        let dispatcher = AlertDispatcher::from_config(&config);
        if config.log_all_attempts || dispatcher.crosses_threshold(assessment.score) {
            self.logger.log(
                EventType::OrderAnalysis,
                client,
                order_analysis_payload(&assessment, order_id),
            );
        }

        if let Some(payload) = dispatcher.for_assessment(&assessment, client) {
            self.send_alert(&dispatcher, &payload, client);
        }

        Some(assessment)
    }

    /// Score facts with the current lists, no side effects
    pub fn score(&self, facts: &OrderFacts) -> RiskAssessment {
        RiskScorer::new(ScoringRules::from_config(&self.config())).score(facts)
    }

    /// Deliver with no lock held. The alert is always logged; only an
    /// accepted delivery counts toward `alerts_sent`.
    fn send_alert(&self, dispatcher: &AlertDispatcher, payload: &AlertPayload, client: &ClientContext) -> bool {
        let delivered = dispatcher.deliver(payload, self.transport.as_ref());
        if delivered {
            self.stats.record(StatsDelta::alert());
        }
        self.logger.log(
            EventType::HighRiskAlert,
            client,
            alert_payload(payload.class.as_str(), &payload.subject, payload.risk_score, delivered),
        );
        delivered
    }

    // ========================================================================
    // ADMIN
    // ========================================================================

    pub fn config(&self) -> FraudConfig {
        self.config.read().clone()
    }

    /// Validate, persist, then swap in the new settings
    pub fn update_settings(&self, update: &SettingsUpdate) -> ShieldResult<FraudConfig> {
        let mut config = self.config.write();
        let next = update.apply(&config)?;
        next.save()?;

        *config = next.clone();
        log::info!("Settings updated (enabled: {}, threshold: {})", next.enabled, next.alert_threshold);
        Ok(next)
    }

    pub fn logger(&self) -> &Arc<EventLogger> {
        &self.logger
    }

    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Notice shown when the trap line is dropped without a fee
fn removal_notice(analysis: &CartAnalysis) -> Notice {
    let message = if analysis.only_suspicious {
        "The product in your cart is no longer available and has been removed."
    } else {
        "One product in your cart is no longer available and has been removed."
    };
    Notice {
        level: NoticeLevel::Notice,
        message: message.to_string(),
    }
}
