//! Fraud Shield Configuration
//!
//! Typed configuration with explicit defaults. Loaded once at startup
//! (defaults -> `config.json` -> environment), validated, and replaced
//! wholesale by admin updates.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use super::error::{ShieldError, ShieldResult};
use super::risk::StorageMode;

// ============================================================================
// FRAUD CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudConfig {
    /// Master switch, every entry point is a no-op when false
    pub enabled: bool,
    /// Minimum risk score (1-100) that raises an alert
    pub alert_threshold: u8,
    /// Attach the security fee when the honeypot fires
    pub auto_security_fee: bool,
    /// Hand alerts to the transport
    pub email_alerts: bool,
    /// Event logging switch
    pub log_all_attempts: bool,
    pub honeypot_product_ids: BTreeSet<u64>,
    /// Fee per trapped unit
    pub security_fee_unit: f64,
    pub security_fee_label: String,
    pub disposable_email_domains: Vec<String>,
    pub high_risk_countries: Vec<String>,
    pub bot_signatures: Vec<String>,
    pub risky_payment_methods: Vec<String>,
    /// Which order source feeds the scorer
    pub storage_mode: StorageMode,
    /// Site name used in alert subjects
    pub site_name: String,
    pub alert_recipient: Option<String>,
    /// Root for log partitions, stats and config
    pub data_dir: PathBuf,
    pub recent_events_capacity: usize,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            alert_threshold: constants::DEFAULT_ALERT_THRESHOLD,
            auto_security_fee: true,
            email_alerts: true,
            log_all_attempts: true,
            honeypot_product_ids: BTreeSet::from([constants::DEFAULT_HONEYPOT_PRODUCT_ID]),
            security_fee_unit: constants::DEFAULT_SECURITY_FEE,
            security_fee_label: constants::DEFAULT_SECURITY_FEE_LABEL.to_string(),
            disposable_email_domains: owned(constants::DEFAULT_DISPOSABLE_EMAIL_DOMAINS),
            high_risk_countries: owned(constants::DEFAULT_HIGH_RISK_COUNTRIES),
            bot_signatures: owned(constants::DEFAULT_BOT_SIGNATURES),
            risky_payment_methods: owned(constants::DEFAULT_RISKY_PAYMENT_METHODS),
            storage_mode: StorageMode::default(),
            site_name: constants::default_site_name(),
            alert_recipient: None,
            data_dir: constants::default_data_dir(),
            recent_events_capacity: constants::DEFAULT_RECENT_EVENTS_CAPACITY,
        }
    }
}

impl FraudConfig {
    /// Default config rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Validate ranges and normalise list casing.
    ///
    /// Domains, signatures and payment methods are lower-cased, countries
    /// upper-cased, blanks dropped.
    pub fn validated(mut self) -> ShieldResult<Self> {
        if !(1..=100).contains(&self.alert_threshold) {
            return Err(ShieldError::InvalidConfig(format!(
                "alert_threshold must be within 1-100, got {}",
                self.alert_threshold
            )));
        }
        if !self.security_fee_unit.is_finite() || self.security_fee_unit < 0.0 {
            return Err(ShieldError::InvalidConfig(format!(
                "security_fee_unit must be a non-negative amount, got {}",
                self.security_fee_unit
            )));
        }
        if self.recent_events_capacity == 0 {
            return Err(ShieldError::InvalidConfig(
                "recent_events_capacity must be at least 1".to_string(),
            ));
        }

        self.disposable_email_domains = normalize(self.disposable_email_domains, str::to_lowercase);
        self.bot_signatures = normalize(self.bot_signatures, str::to_lowercase);
        self.risky_payment_methods = normalize(self.risky_payment_methods, str::to_lowercase);
        self.high_risk_countries = normalize(self.high_risk_countries, str::to_uppercase);

        Ok(self)
    }

    pub fn is_honeypot(&self, product_id: u64) -> bool {
        self.honeypot_product_ids.contains(&product_id)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(constants::LOG_DIR)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join(constants::STATS_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(constants::CONFIG_FILE)
    }

    /// Load config: defaults, then `<data_dir>/config.json`, then env overrides.
    ///
    /// `data_dir` wins over `FRAUD_SHIELD_DATA_DIR`, which wins over the
    /// platform default.
    pub fn load(data_dir: Option<PathBuf>) -> ShieldResult<Self> {
        let dir = data_dir.unwrap_or_else(constants::get_data_dir);
        let path = dir.join(constants::CONFIG_FILE);

        let mut config = if path.exists() {
            let data = fs::read(&path)?;
            let config: FraudConfig = serde_json::from_slice(&data)?;
            log::info!("Loaded configuration from {:?}", path);
            config
        } else {
            log::info!("No configuration at {:?}, using defaults", path);
            FraudConfig::default()
        };
        config.data_dir = dir;

        if let Some(enabled) = constants::get_enabled_override() {
            config.enabled = enabled;
        }
        if let Some(threshold) = constants::get_alert_threshold_override() {
            config.alert_threshold = threshold;
        }
        if let Some(site) = constants::get_site_name_override() {
            config.site_name = site;
        }

        config.validated()
    }

    /// Persist to `<data_dir>/config.json`
    pub fn save(&self) -> ShieldResult<()> {
        save_to(self, &self.config_path())
    }
}

fn normalize(list: Vec<String>, case: fn(&str) -> String) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(list.len());
    for item in list {
        let item = case(item.trim());
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn save_to(config: &FraudConfig, path: &Path) -> ShieldResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

// ============================================================================
// SETTINGS UPDATE (admin form)
// ============================================================================

/// Partial update submitted from the settings form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub enabled: Option<bool>,
    pub alert_threshold: Option<u8>,
    pub auto_security_fee: Option<bool>,
    pub email_alerts: Option<bool>,
    pub log_all_attempts: Option<bool>,
}

impl SettingsUpdate {
    /// Apply on top of `current`, returning the validated result
    pub fn apply(&self, current: &FraudConfig) -> ShieldResult<FraudConfig> {
        let mut next = current.clone();
        if let Some(v) = self.enabled {
            next.enabled = v;
        }
        if let Some(v) = self.alert_threshold {
            next.alert_threshold = v;
        }
        if let Some(v) = self.auto_security_fee {
            next.auto_security_fee = v;
        }
        if let Some(v) = self.email_alerts {
            next.email_alerts = v;
        }
        if let Some(v) = self.log_all_attempts {
            next.log_all_attempts = v;
        }
        next.validated()
    }
}

// ============================================================================
// TESTS
// ============================================================================
