//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment overrides are read here too, so `FraudConfig::load` only
//! has to call the getters below.

use std::path::PathBuf;

/// Honeypot product id shipped with the default configuration
pub const DEFAULT_HONEYPOT_PRODUCT_ID: u64 = 604098;

/// Security fee charged per trapped unit
pub const DEFAULT_SECURITY_FEE: f64 = 9999.0;

/// Label the customer sees on the fee line
pub const DEFAULT_SECURITY_FEE_LABEL: &str = "Security Verification Fee";

/// Fee line id, used to recognise our fee on carts and orders
pub const SECURITY_FEE_ID: &str = "fraud_shield_security_fee";

/// Recommended alert threshold (score 0-100)
pub const DEFAULT_ALERT_THRESHOLD: u8 = 60;

/// Capacity of the in-memory recent events ring
pub const DEFAULT_RECENT_EVENTS_CAPACITY: usize = 200;

/// Sub-directory of the data dir holding the log partitions
pub const LOG_DIR: &str = "logs";

/// Persisted running statistics
pub const STATS_FILE: &str = "stats.json";

/// Persisted configuration
pub const CONFIG_FILE: &str = "config.json";

/// User-agent characters kept in alert bodies
pub const ALERT_USER_AGENT_MAX: usize = 100;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Fraud Shield";

pub const DEFAULT_DISPOSABLE_EMAIL_DOMAINS: &[&str] = &[
    "10minutemail.com",
    "guerrillamail.com",
    "mailinator.com",
    "tempmail.org",
    "temp-mail.org",
    "yopmail.com",
    "throwaway.email",
    "getnada.com",
    "trashmail.com",
    "sharklasers.com",
    "dispostable.com",
    "maildrop.cc",
];

pub const DEFAULT_HIGH_RISK_COUNTRIES: &[&str] = &[
    "NG", "GH", "KE", "PK", "BD", "ID", "VN", "PH", "CI", "CM",
];

pub const DEFAULT_BOT_SIGNATURES: &[&str] = &[
    "bot", "crawler", "scraper", "curl", "wget", "python", "java",
    "automation", "selenium", "phantom", "headless", "spider",
];

pub const DEFAULT_RISKY_PAYMENT_METHODS: &[&str] = &["cod", "cheque"];

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Default data directory (logs, stats, config)
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fraud-shield")
}

/// Get data directory from environment or use default
pub fn get_data_dir() -> PathBuf {
    std::env::var("FRAUD_SHIELD_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_data_dir())
}

/// Site name shown in alert subjects, defaults to the machine hostname
pub fn default_site_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "shop".to_string())
}

/// Master switch override
pub fn get_enabled_override() -> Option<bool> {
    std::env::var("FRAUD_SHIELD_ENABLED")
        .ok()
        .map(|s| s.to_lowercase() != "false" && s != "0")
}

/// Alert threshold override
pub fn get_alert_threshold_override() -> Option<u8> {
    std::env::var("FRAUD_SHIELD_ALERT_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Site name override
pub fn get_site_name_override() -> Option<String> {
    std::env::var("FRAUD_SHIELD_SITE_NAME").ok().filter(|s| !s.is_empty())
}

/// Alert webhook URL, when set alerts are POSTed instead of only logged
pub fn get_alert_webhook() -> Option<String> {
    std::env::var("FRAUD_SHIELD_ALERT_WEBHOOK").ok().filter(|s| !s.is_empty())
}
