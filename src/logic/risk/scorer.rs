//! Risk Scorer
//!
//! Runs every analyzer, sums contributions, clamps to 0-100, buckets the tier.

use std::collections::{BTreeMap, BTreeSet};

use super::analyzers::Category;
use super::facts::OrderFacts;
use super::rules::{ScoringRules, MAX_SCORE};
use super::types::{RiskAssessment, RiskLevel};

#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    rules: ScoringRules,
}

impl RiskScorer {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn score(&self, facts: &OrderFacts) -> RiskAssessment {
        if facts.is_empty() {
            let mut details = BTreeMap::new();
            details.insert("general".to_string(), "No order data to analyze".to_string());
            return RiskAssessment {
                details,
                ..RiskAssessment::default()
            };
        }

        let mut raw_score = 0u32;
        let mut factor_tags = BTreeSet::new();
        let mut details = BTreeMap::new();

        for category in Category::ALL {
            let result = category.analyze(facts, &self.rules);
            if result.is_clean() {
                continue;
            }
            raw_score += result.score;
            factor_tags.extend(result.tags);
            details.insert(category.as_str().to_string(), result.detail);
        }

        let score = raw_score.min(MAX_SCORE) as u8;
        RiskAssessment {
            score,
            raw_score,
            factor_tags,
            details,
            risk_level: RiskLevel::from_score(score),
        }
    }
}

/// Score with the default lists
pub fn score(facts: &OrderFacts) -> RiskAssessment {
    RiskScorer::default().score(facts)
}
