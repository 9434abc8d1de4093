//! Security Fee Applicator
//!
//! Attaches `unit x quantity` as a taxable cart fee. Recalculation hooks can
//! fire several times for one user action, so every application goes
//! through the `CheckoutCycle` token of the outer cart evaluation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::SECURITY_FEE_ID;
use crate::logic::config::FraudConfig;
use super::cart::{Cart, CartFee, Notice, NoticeLevel};
use super::detector::HoneypotDetection;

// ============================================================================
// CHECKOUT CYCLE
// ============================================================================

/// Idempotency token for one checkout computation cycle.
///
/// Create one at the start of each outer cart evaluation and pass it to
/// every recalculation of that cycle. Never share it across requests.
#[derive(Debug, Clone)]
pub struct CheckoutCycle {
    token: Uuid,
    passes: u32,
    charged: HashSet<u64>,
    notice_shown: bool,
}

impl CheckoutCycle {
    pub fn begin() -> Self {
        Self {
            token: Uuid::new_v4(),
            passes: 0,
            charged: HashSet::new(),
            notice_shown: false,
        }
    }

    pub fn token(&self) -> Uuid {
        self.token
    }

    /// Count one recalculation pass, returns the pass number (1-based)
    pub fn enter(&mut self) -> u32 {
        self.passes += 1;
        self.passes
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Trigger already handled in this cycle
    pub fn has_charged(&self, product_id: u64) -> bool {
        self.charged.contains(&product_id)
    }

    /// Claim a trigger, false if it was already claimed
    pub fn claim(&mut self, product_id: u64) -> bool {
        self.charged.insert(product_id)
    }

    /// True the first time it is called in this cycle
    pub fn take_notice_slot(&mut self) -> bool {
        !std::mem::replace(&mut self.notice_shown, true)
    }
}

impl Default for CheckoutCycle {
    fn default() -> Self {
        Self::begin()
    }
}

// ============================================================================
// FEE APPLICATOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFee {
    pub product_id: u64,
    pub quantity: u32,
    pub amount: f64,
}

#[derive(Debug, Clone)]
pub struct FeeApplicator {
    unit: f64,
    label: String,
}

impl FeeApplicator {
    pub fn new(unit: f64, label: &str) -> Self {
        Self {
            unit,
            label: label.to_string(),
        }
    }

    pub fn from_config(config: &FraudConfig) -> Self {
        Self::new(config.security_fee_unit, &config.security_fee_label)
    }

    pub fn fee_for(&self, quantity: u32) -> f64 {
        self.unit * quantity as f64
    }

    /// Attach the fee for `trigger` unless this cycle already did.
    ///
    /// Returns `None` for no trigger or a duplicate attempt. The customer
    /// notice is appended once per cycle.
    pub fn apply<C: Cart + ?Sized>(
        &self,
        cart: &mut C,
        trigger: &HoneypotDetection,
        cycle: &mut CheckoutCycle,
    ) -> Option<AppliedFee> {
        if !trigger.detected {
            return None;
        }
        let product_id = trigger.product_id?;

        if !cycle.claim(product_id) {
            log::debug!(
                "Security fee for product {} already applied in cycle {}, skipping",
                product_id,
                cycle.token()
            );
            return None;
        }

        let amount = self.fee_for(trigger.quantity);
        cart.add_fee(CartFee {
            id: format!("{}_{}", SECURITY_FEE_ID, product_id),
            label: self.label.clone(),
            amount,
            taxable: true,
        });

        if cycle.take_notice_slot() {
            cart.add_notice(Notice {
                level: NoticeLevel::Error,
                message: format!(
                    "Suspect activity detected - security deployed. A {} of {:.2} has been added to this order.",
                    self.label, amount
                ),
            });
        }

        log::info!(
            "Security fee {:.2} applied (product {}, qty {})",
            amount,
            product_id,
            trigger.quantity
        );

        Some(AppliedFee {
            product_id,
            quantity: trigger.quantity,
            amount,
        })
    }
}
