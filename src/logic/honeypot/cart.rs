//! Cart collaborator
//!
//! The checkout owns the real cart; the core sees it through `Cart`.
//! `CartSnapshot` is the in-memory implementation rebuilt per recalculation.

use serde::{Deserialize, Serialize};

use crate::constants::SECURITY_FEE_ID;

// ============================================================================
// CART TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: u64,
    pub quantity: u32,
    pub line_total: f64,
}

impl LineItem {
    pub fn new(product_id: u64, quantity: u32, line_total: f64) -> Self {
        Self { product_id, quantity, line_total }
    }
}

/// Cart-level fee line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartFee {
    pub id: String,
    pub label: String,
    pub amount: f64,
    pub taxable: bool,
}

impl CartFee {
    /// Fee attached by the fee applicator
    pub fn is_security_fee(&self) -> bool {
        self.id.starts_with(SECURITY_FEE_ID)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Error,
    Notice,
}

/// Customer-visible message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

// ============================================================================
// CART TRAIT
// ============================================================================

pub trait Cart {
    fn line_items(&self) -> &[LineItem];

    /// Remove the line at `index`, returning it
    fn remove_line(&mut self, index: usize) -> Option<LineItem>;

    fn fees(&self) -> &[CartFee];

    fn add_fee(&mut self, fee: CartFee);

    fn add_notice(&mut self, notice: Notice);

    fn is_empty(&self) -> bool {
        self.line_items().is_empty()
    }

    /// Line totals plus fees
    fn total(&self) -> f64 {
        let lines: f64 = self.line_items().iter().map(|l| l.line_total).sum();
        let fees: f64 = self.fees().iter().map(|f| f.amount).sum();
        lines + fees
    }

    fn has_security_fee(&self) -> bool {
        self.fees().iter().any(CartFee::is_security_fee)
    }
}

// ============================================================================
// CART SNAPSHOT
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    items: Vec<LineItem>,
    fees: Vec<CartFee>,
    notices: Vec<Notice>,
}

impl CartSnapshot {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn with_item(mut self, product_id: u64, quantity: u32, line_total: f64) -> Self {
        self.items.push(LineItem::new(product_id, quantity, line_total));
        self
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Sum of line quantities
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }
}

impl Cart for CartSnapshot {
    fn line_items(&self) -> &[LineItem] {
        &self.items
    }

    fn remove_line(&mut self, index: usize) -> Option<LineItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    fn fees(&self) -> &[CartFee] {
        &self.fees
    }

    fn add_fee(&mut self, fee: CartFee) {
        self.fees.push(fee);
    }

    fn add_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_totals() {
        let mut cart = CartSnapshot::default()
            .with_item(1, 2, 20.0)
            .with_item(2, 1, 5.5);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), 25.5);

        cart.add_fee(CartFee {
            id: format!("{}_1", SECURITY_FEE_ID),
            label: "fee".into(),
            amount: 10.0,
            taxable: true,
        });
        assert!(cart.has_security_fee());
        assert_eq!(cart.total(), 35.5);
        assert!(cart.remove_line(5).is_none());
    }
}
