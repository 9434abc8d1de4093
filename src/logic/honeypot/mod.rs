//! Honeypot Module
//!
//! Trap product detection and the punitive security fee.
//!
//! ## Structure
//! - `cart`: Cart collaborator trait + in-memory `CartSnapshot`
//! - `detector`: Finds and removes the trap line
//! - `fee`: Fee applicator guarded by a per-cycle `CheckoutCycle` token

pub mod cart;
pub mod detector;
pub mod fee;

pub use cart::{Cart, CartFee, CartSnapshot, LineItem, Notice, NoticeLevel};
pub use detector::{analyze_cart, detect, CartAnalysis, HoneypotDetection};
pub use fee::{AppliedFee, CheckoutCycle, FeeApplicator};
