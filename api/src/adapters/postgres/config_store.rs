//! PostgreSQL adapter for ConfigStore
//!
//! Reads the `app_config` and `feature_flags` tables on every call so operator
//! edits apply to the next submission.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::domain::ports::ConfigStore;
use crate::entity::{app_config, feature_flags};
use crate::error::DomainError;

/// PostgreSQL implementation of ConfigStore
pub struct PostgresConfigStore {
    db: DatabaseConnection,
}

impl PostgresConfigStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConfigStore for PostgresConfigStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let result = app_config::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.value))
    }

    async fn feature_flag(&self, name: &str) -> Result<Option<bool>, DomainError> {
        let result = feature_flags::Entity::find_by_id(name.to_string())
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.active))
    }
}
