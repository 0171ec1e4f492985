//! Moderation evaluator
//!
//! Combines two independent checks into an accept/blacklist decision:
//! - NSFW: the "safe" confidence must reach the policy threshold (when enabled)
//! - Blacklist: no detected label may appear in the blacklist (exact match)
//!
//! Both checks always run so the verdict reports every reason for a rejection.

use crate::domain::entities::{ModerationPolicy, ModerationState, SafetyReport};

/// Result of the NSFW check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NsfwOutcome {
    /// Check disabled by policy; the report was not consulted
    Skipped,
    Passed { safety_score: f64 },
    Failed { safety_score: f64 },
}

impl NsfwOutcome {
    pub fn passed(&self) -> bool {
        !matches!(self, NsfwOutcome::Failed { .. })
    }
}

/// Combined outcome of both checks
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationVerdict {
    pub nsfw: NsfwOutcome,
    /// Detected labels found in the blacklist, in detection order
    pub blacklisted_hits: Vec<String>,
}

impl ModerationVerdict {
    pub fn is_accepted(&self) -> bool {
        self.nsfw.passed() && self.blacklisted_hits.is_empty()
    }

    pub fn state(&self) -> ModerationState {
        if self.is_accepted() {
            ModerationState::Accepted
        } else {
            ModerationState::Blacklisted
        }
    }
}

/// Evaluate detected labels and an optional safety report against a policy
pub fn evaluate(
    labels: &[String],
    report: Option<&SafetyReport>,
    policy: &ModerationPolicy,
) -> ModerationVerdict {
    ModerationVerdict {
        nsfw: check_nsfw(report, policy),
        blacklisted_hits: check_blacklist(labels, policy),
    }
}

/// A missing report, an indeterminate one, or one without a "safe" category
/// scores 0.
pub fn check_nsfw(report: Option<&SafetyReport>, policy: &ModerationPolicy) -> NsfwOutcome {
    if !policy.nsfw_check_enabled {
        return NsfwOutcome::Skipped;
    }

    let safety_score = report.and_then(|r| r.safe_confidence()).unwrap_or(0.0);

    if safety_score >= policy.safety_confidence_threshold {
        NsfwOutcome::Passed { safety_score }
    } else {
        NsfwOutcome::Failed { safety_score }
    }
}

pub fn check_blacklist(labels: &[String], policy: &ModerationPolicy) -> Vec<String> {
    labels
        .iter()
        .filter(|label| policy.blacklisted_labels.contains(label.as_str()))
        .cloned()
        .collect()
}
