//! Alert Module
//!
//! Operator notifications for high-risk orders and honeypot hits.
//!
//! ## Structure
//! - `types`: AlertClass, AlertPayload (subject/body formatting)
//! - `transport`: AlertTransport trait + log, webhook and memory transports
//! - `dispatcher`: Threshold check and delivery

pub mod dispatcher;
pub mod transport;
pub mod types;

pub use dispatcher::AlertDispatcher;
pub use transport::{transport_from_env, AlertTransport, LogTransport, MemoryTransport, WebhookTransport};
pub use types::{truncate_chars, AlertClass, AlertPayload};
