//! Risk Scoring Rules & Thresholds
//!
//! Weights and thresholds of the seven analyzers, plus the configurable
//! lists they match against. No scoring logic here.

use std::collections::HashSet;

use crate::constants;
use crate::logic::config::FraudConfig;

// ============================================================================
// TIERS
// ============================================================================

pub const CRITICAL_MIN: u8 = 80;
pub const HIGH_MIN: u8 = 60;
pub const MEDIUM_MIN: u8 = 40;
pub const LOW_MIN: u8 = 20;

/// Scores are clamped to this ceiling
pub const MAX_SCORE: u32 = 100;

// ============================================================================
// WEIGHTS
// ============================================================================

/// Honeypot fee already on the order
pub const SECURITY_FEE_POINTS: u32 = 90;

pub const INVALID_EMAIL_POINTS: u32 = 30;
pub const TEMP_EMAIL_POINTS: u32 = 40;
pub const EMAIL_DIGITS_POINTS: u32 = 15;
/// Consecutive digits in the local part that look generated
pub const EMAIL_DIGIT_RUN: usize = 6;

pub const HIGH_RISK_COUNTRY_POINTS: u32 = 25;
pub const COUNTRY_MISMATCH_POINTS: u32 = 15;

// Amount and item count checks stack: both tiers fire above the upper one.
pub const HIGH_AMOUNT: f64 = 1000.0;
pub const HIGH_AMOUNT_POINTS: u32 = 20;
pub const VERY_HIGH_AMOUNT: f64 = 2000.0;
pub const VERY_HIGH_AMOUNT_POINTS: u32 = 35;
pub const MANY_ITEMS: u32 = 20;
pub const MANY_ITEMS_POINTS: u32 = 15;
pub const EXCESSIVE_ITEMS: u32 = 50;
pub const EXCESSIVE_ITEMS_POINTS: u32 = 25;
pub const LOW_AVERAGE_PRICE: f64 = 5.0;
pub const LOW_AVERAGE_PRICE_POINTS: u32 = 10;

pub const GUEST_POINTS: u32 = 10;
pub const SHORT_NAME_POINTS: u32 = 15;
pub const MIN_NAME_CHARS: usize = 3;
pub const REPEATED_NAME_POINTS: u32 = 20;
pub const REPEATED_CHAR_RUN: usize = 4;
pub const LONG_NAME_POINTS: u32 = 10;
pub const MAX_NAME_CHARS: usize = 100;

pub const INVALID_IP_POINTS: u32 = 20;
pub const SHORT_USER_AGENT_POINTS: u32 = 15;
pub const MIN_USER_AGENT_CHARS: usize = 10;
pub const BOT_USER_AGENT_POINTS: u32 = 25;

pub const RISKY_PAYMENT_POINTS: u32 = 10;

// ============================================================================
// LISTS
// ============================================================================

/// Lookup lists, normalised to the casing the analyzers compare with
#[derive(Debug, Clone)]
pub struct ScoringRules {
    /// lower-case domains
    pub disposable_domains: HashSet<String>,
    /// upper-case ISO codes
    pub high_risk_countries: HashSet<String>,
    /// lower-case, checked in order
    pub bot_signatures: Vec<String>,
    /// lower-case gateway ids
    pub risky_payment_methods: HashSet<String>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            disposable_domains: lower_set(constants::DEFAULT_DISPOSABLE_EMAIL_DOMAINS.iter().copied()),
            high_risk_countries: constants::DEFAULT_HIGH_RISK_COUNTRIES
                .iter()
                .map(|c| c.to_uppercase())
                .collect(),
            bot_signatures: constants::DEFAULT_BOT_SIGNATURES
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            risky_payment_methods: lower_set(constants::DEFAULT_RISKY_PAYMENT_METHODS.iter().copied()),
        }
    }
}

impl ScoringRules {
    pub fn from_config(config: &FraudConfig) -> Self {
        Self {
            disposable_domains: lower_set(config.disposable_email_domains.iter().map(String::as_str)),
            high_risk_countries: config
                .high_risk_countries
                .iter()
                .map(|c| c.trim().to_uppercase())
                .collect(),
            bot_signatures: config
                .bot_signatures
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            risky_payment_methods: lower_set(config.risky_payment_methods.iter().map(String::as_str)),
        }
    }
}

fn lower_set<'a>(items: impl Iterator<Item = &'a str>) -> HashSet<String> {
    items
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
