//! Honeypot Detector
//!
//! Finds the trap product in a cart and pulls it out. One trigger per pass:
//! a second honeypot line is caught on the next recalculation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::cart::Cart;

/// Outcome of one detection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoneypotDetection {
    pub detected: bool,
    pub product_id: Option<u64>,
    pub quantity: u32,
}

impl HoneypotDetection {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Read-only view of how much of the cart is bait
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartAnalysis {
    pub total_items: usize,
    pub suspicious_items: usize,
    pub suspicious_products: Vec<u64>,
    /// Non-empty cart made only of honeypot lines
    pub only_suspicious: bool,
    pub cart_total: f64,
}

/// Scan lines in order, remove the first honeypot line and report it
pub fn detect<C: Cart + ?Sized>(cart: &mut C, honeypot_ids: &BTreeSet<u64>) -> HoneypotDetection {
    let hit = cart
        .line_items()
        .iter()
        .position(|line| honeypot_ids.contains(&line.product_id));

    let Some(index) = hit else {
        return HoneypotDetection::none();
    };

    match cart.remove_line(index) {
        Some(line) => {
            log::debug!(
                "Honeypot product {} found (qty {}), removed from cart",
                line.product_id,
                line.quantity
            );
            HoneypotDetection {
                detected: true,
                product_id: Some(line.product_id),
                quantity: line.quantity,
            }
        }
        None => HoneypotDetection::none(),
    }
}

pub fn analyze_cart<C: Cart + ?Sized>(cart: &C, honeypot_ids: &BTreeSet<u64>) -> CartAnalysis {
    let lines = cart.line_items();
    let suspicious_products: Vec<u64> = lines
        .iter()
        .map(|l| l.product_id)
        .filter(|id| honeypot_ids.contains(id))
        .collect();

    CartAnalysis {
        total_items: lines.len(),
        suspicious_items: suspicious_products.len(),
        only_suspicious: !lines.is_empty() && suspicious_products.len() == lines.len(),
        suspicious_products,
        cart_total: cart.total(),
    }
}
