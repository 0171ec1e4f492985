//! Configuration store port trait
//!
//! Operator-editable tunables and feature flags. A missing key or flag is
//! `Ok(None)`, never an error; callers apply their own defaults.

use async_trait::async_trait;

use crate::error::DomainError;

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Look up a string value by key
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Look up whether a named feature flag is active
    async fn feature_flag(&self, name: &str) -> Result<Option<bool>, DomainError>;
}
