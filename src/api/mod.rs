//! API Module
//!
//! Admin operations for the reporting UI, as plain functions over a
//! `FraudShield`. Transport (HTTP, IPC) is the host's business.
//!
//! Usage:
//! - `api::commands::get_statistics(&shield)`
//! - `api::commands::clear_logs(&shield, Some("honeypot"))`

pub mod commands;

pub use commands::*;
