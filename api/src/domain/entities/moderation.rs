//! Moderation domain types
//!
//! The policy snapshot evaluated for each submission and the safety report
//! returned by the tagging provider.

use std::collections::HashSet;

/// Name of the provider category whose confidence is the safety score
pub const SAFE_CATEGORY: &str = "safe";

/// One category from a safety classification, confidence in percent (0-100)
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyCategory {
    pub name: String,
    pub confidence: f64,
}

/// Safety classification for an image
#[derive(Debug, Clone, PartialEq)]
pub enum SafetyReport {
    Categories(Vec<SafetyCategory>),
    /// The provider answered but the report was missing or incomplete
    Indeterminate,
}

impl SafetyReport {
    /// Confidence of the "safe" category, matched trimmed and case-insensitively
    pub fn safe_confidence(&self) -> Option<f64> {
        match self {
            SafetyReport::Categories(categories) => categories
                .iter()
                .find(|c| c.name.trim().to_lowercase() == SAFE_CATEGORY)
                .map(|c| c.confidence),
            SafetyReport::Indeterminate => None,
        }
    }
}

/// Moderation tunables read from the config store at evaluation time
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationPolicy {
    pub nsfw_check_enabled: bool,
    /// Minimum "safe" confidence, 0-100
    pub safety_confidence_threshold: f64,
    pub blacklisted_labels: HashSet<String>,
}
