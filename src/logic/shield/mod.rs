//! Shield Module
//!
//! The service object the checkout embeds.

pub mod service;

pub use service::{CartOutcome, FraudShield};
