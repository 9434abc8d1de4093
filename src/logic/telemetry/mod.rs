//! Telemetry Module
//!
//! Fraud event logging. Without these records an operator cannot:
//! - Trace why an order was flagged
//! - Count this month's detections
//! - Audit what the shield did to a cart
//!
//! ## Structure
//! - `event.rs` - FraudEvent struct (immutable, timestamped) + payload builders
//! - `recorder.rs` - Per-type, per-month JSONL partitions + recent ring

pub mod event;
pub mod recorder;

pub use event::{current_month, month_key, EventType, FraudEvent};
pub use recorder::{EventLogger, PartitionInfo, PartitionKey};
