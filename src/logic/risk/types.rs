//! Risk Types
//!
//! Core types for order risk scoring.
//! No logic here beyond small constructors and tier bucketing.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::rules::{CRITICAL_MIN, HIGH_MIN, LOW_MIN, MEDIUM_MIN};

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Risk tier derived from the aggregate score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Bucket a clamped score, highest threshold first
    pub fn from_score(score: u8) -> Self {
        if score >= CRITICAL_MIN {
            RiskLevel::Critical
        } else if score >= HIGH_MIN {
            RiskLevel::High
        } else if score >= MEDIUM_MIN {
            RiskLevel::Medium
        } else if score >= LOW_MIN {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "MINIMAL",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// FACTOR RESULT (one analyzer)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactorResult {
    pub score: u32,
    pub tags: BTreeSet<String>,
    pub detail: String,
}

impl RiskFactorResult {
    /// Record one fired sub-check
    pub fn add(&mut self, points: u32, tag: &str, reason: impl AsRef<str>) {
        self.score += points;
        self.tags.insert(tag.to_string());
        if !self.detail.is_empty() {
            self.detail.push_str("; ");
        }
        self.detail.push_str(reason.as_ref());
    }

    pub fn is_clean(&self) -> bool {
        self.score == 0
    }
}

// ============================================================================
// ASSESSMENT
// ============================================================================

/// Final, immutable verdict for one checkout attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Clamped to 0-100
    pub score: u8,
    /// Unclamped sum of contributions
    pub raw_score: u32,
    pub factor_tags: BTreeSet<String>,
    /// category -> what fired
    pub details: BTreeMap<String, String>,
    pub risk_level: RiskLevel,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            score: 0,
            raw_score: 0,
            factor_tags: BTreeSet::new(),
            details: BTreeMap::new(),
            risk_level: RiskLevel::Minimal,
        }
    }
}

impl RiskAssessment {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.factor_tags.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_buckets() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Minimal);
        assert_eq!(RiskLevel::from_score(19), RiskLevel::Minimal);
        assert_eq!(RiskLevel::from_score(20), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(79), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(80), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Critical);
    }

    #[test]
    fn test_level_serializes_uppercase() {
        let json = serde_json::to_string(&RiskLevel::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
    }

    #[test]
    fn test_factor_result_accumulates() {
        let mut r = RiskFactorResult::default();
        assert!(r.is_clean());
        r.add(20, "high_amount", "Amount above 1000");
        r.add(35, "very_high_amount", "Amount above 2000");
        assert_eq!(r.score, 55);
        assert_eq!(r.tags.len(), 2);
        assert_eq!(r.detail, "Amount above 1000; Amount above 2000");
    }
}
