//! Moderation policy loading
//!
//! Builds a `ModerationPolicy` from the config store on every call. Missing
//! entries fall back to hard-coded defaults with a warning so moderation keeps
//! working before an operator has configured anything.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::ModerationPolicy;
use crate::domain::ports::ConfigStore;
use crate::error::DomainError;

/// Config key for the Imagga category set used for safety classification
pub const NSFW_CATEGORIZER_ID_KEY: &str = "IMAGGA_NSFW_CATEGORIZER_ID";

/// Config key for the comma-separated blacklisted labels
pub const BLACKLISTED_ITEMS_KEY: &str = "BLACKLISTED_ITEMS";

/// Config key for the minimum "safe" confidence (0-100)
pub const SAFETY_CONFIDENCE_THRESHOLD_KEY: &str = "SAFETY_CONFIDENCE_THRESHOLD";

/// Feature flag toggling the NSFW check
pub const NSFW_CHECK_FLAG: &str = "IMAGGA_NSFW_CHECK";

/// Imagga's NSFW categorizer
pub const DEFAULT_NSFW_CATEGORIZER_ID: &str = "nsfw_beta";

/// Parse a comma-separated blacklist. Entries are trimmed; empty ones dropped.
pub fn parse_blacklist(value: &str) -> HashSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a confidence threshold, clamped to 0-100
pub fn parse_threshold(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
        .map(|t| t.clamp(0.0, 100.0))
}

/// Reads moderation tunables from a config store
pub struct PolicyLoader<CS>
where
    CS: ConfigStore,
{
    config: Arc<CS>,
    default_threshold: f64,
}

impl<CS> PolicyLoader<CS>
where
    CS: ConfigStore,
{
    pub fn new(config: Arc<CS>, default_threshold: f64) -> Self {
        Self {
            config,
            default_threshold,
        }
    }

    /// Snapshot the current policy. Not cached.
    pub async fn load(&self) -> Result<ModerationPolicy, DomainError> {
        let nsfw_check_enabled = self.nsfw_check_enabled().await;

        let blacklisted_labels = match self.config.get(BLACKLISTED_ITEMS_KEY).await? {
            Some(value) => parse_blacklist(&value),
            None => {
                tracing::warn!(
                    key = BLACKLISTED_ITEMS_KEY,
                    "Config key missing, using an empty blacklist"
                );
                HashSet::new()
            }
        };

        let safety_confidence_threshold =
            match self.config.get(SAFETY_CONFIDENCE_THRESHOLD_KEY).await? {
                Some(value) => parse_threshold(&value).unwrap_or_else(|| {
                    tracing::warn!(
                        key = SAFETY_CONFIDENCE_THRESHOLD_KEY,
                        value = %value,
                        default = self.default_threshold,
                        "Config value is not a number, using default threshold"
                    );
                    self.default_threshold
                }),
                None => {
                    tracing::warn!(
                        key = SAFETY_CONFIDENCE_THRESHOLD_KEY,
                        default = self.default_threshold,
                        "Config key missing, using default threshold"
                    );
                    self.default_threshold
                }
            };

        Ok(ModerationPolicy {
            nsfw_check_enabled,
            safety_confidence_threshold,
            blacklisted_labels,
        })
    }

    /// Category set to query for safety classification
    pub async fn nsfw_categorizer_id(&self) -> Result<String, DomainError> {
        match self.config.get(NSFW_CATEGORIZER_ID_KEY).await? {
            Some(id) if !id.trim().is_empty() => Ok(id.trim().to_string()),
            _ => {
                tracing::warn!(
                    key = NSFW_CATEGORIZER_ID_KEY,
                    default = DEFAULT_NSFW_CATEGORIZER_ID,
                    "Config key missing, using default categorizer"
                );
                Ok(DEFAULT_NSFW_CATEGORIZER_ID.to_string())
            }
        }
    }

    /// The flag lookup never fails the pipeline: absent or unreadable means off
    async fn nsfw_check_enabled(&self) -> bool {
        match self.config.feature_flag(NSFW_CHECK_FLAG).await {
            Ok(Some(active)) => active,
            Ok(None) => {
                tracing::warn!(
                    flag = NSFW_CHECK_FLAG,
                    "Feature flag missing, NSFW check disabled"
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    flag = NSFW_CHECK_FLAG,
                    error = %e,
                    "Feature flag lookup failed, NSFW check disabled"
                );
                false
            }
        }
    }
}
