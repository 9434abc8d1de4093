//! Fraud Shield Core
//!
//! Checkout fraud decisions: honeypot trap with security fee, order risk
//! scoring, event logging, running stats and operator alerts.

pub mod api;
pub mod constants;
pub mod logic;

pub use logic::shield::FraudShield;
