//! Logic Module - Fraud Engines
//!
//! ## Structure
//! - `client` - Client IP / user-agent resolution
//! - `honeypot/` - Trap product detection + security fee
//! - `risk/` - Seven-factor order risk scoring
//! - `telemetry/` - Per-type, per-month event log + recent ring
//! - `stats/` - Persistent running counters
//! - `alert/` - Alert payloads, transports, dispatcher
//! - `shield/` - The service tying them together

pub mod error;
pub mod config;
pub mod client;

pub mod honeypot;
pub mod risk;

pub mod telemetry;
pub mod stats;
pub mod alert;

pub mod shield;
