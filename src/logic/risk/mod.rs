//! Risk Scoring Module
//!
//! Pure, deterministic order risk scoring.
//!
//! ## Structure
//! - `types`: RiskLevel, RiskFactorResult, RiskAssessment
//! - `rules`: Weights, thresholds and the configurable lists
//! - `facts`: OrderFacts and the two order sources
//! - `analyzers`: The seven factor analyzers
//! - `scorer`: Sums, clamps and buckets

pub mod analyzers;
pub mod facts;
pub mod rules;
pub mod scorer;
pub mod types;

pub use analyzers::Category;
pub use facts::{Address, CheckoutFields, OrderFacts, OrderItem, OrderRecord, OrderSource, StorageMode};
pub use rules::ScoringRules;
pub use scorer::{score, RiskScorer};
pub use types::{RiskAssessment, RiskFactorResult, RiskLevel};
