//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{ImageId, ImageSubmission, ModerationState};
use crate::error::DomainError;

/// Query-time filter for listing images.
///
/// `object` is a case-insensitive substring match over detected labels. It is
/// a search convenience and unrelated to the exact blacklist matching done
/// during moderation. `created_after` is inclusive and `created_before`
/// exclusive, so a day is `[midnight, next midnight)`.
#[derive(Debug, Clone, Default)]
pub struct ImageFilter {
    pub object: Option<String>,
    pub state: Option<ModerationState>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

/// Repository for image submissions
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Find an image by ID
    async fn find_by_id(&self, id: &ImageId) -> Result<Option<ImageSubmission>, DomainError>;

    /// Insert a new pending image
    async fn create(&self, image: &ImageSubmission) -> Result<(), DomainError>;

    /// Write the upload, labels and moderation outcome of an existing image
    /// in a single update
    async fn save(&self, image: &ImageSubmission) -> Result<(), DomainError>;

    /// List images matching the filter, oldest first
    async fn list(
        &self,
        filter: &ImageFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<ImageSubmission>, DomainError>;
}
