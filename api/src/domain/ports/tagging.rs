//! Tagging provider port trait
//!
//! Defines the interface for the external image-recognition service that
//! labels images and classifies them for safety.

use async_trait::async_trait;

use crate::domain::entities::{ImageLocator, SafetyReport, UploadReference};
use crate::error::ProviderError;

/// Port trait for tagging provider operations
#[async_trait]
pub trait TaggingProvider: Send + Sync {
    /// Register raw image bytes with the provider
    async fn register_upload(
        &self,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<UploadReference, ProviderError>;

    /// Fetch labels for a previously registered upload.
    /// An empty or absent tag list yields an empty vec.
    async fn fetch_labels_for_upload(&self, upload_id: &str) -> Result<Vec<String>, ProviderError>;

    /// Fetch labels for a remote image, skipping the upload step
    async fn fetch_labels_for_url(&self, source_url: &str) -> Result<Vec<String>, ProviderError>;

    /// Fetch the safety classification of an image from a category set.
    /// Malformed reports come back as `SafetyReport::Indeterminate`.
    async fn fetch_safety_categories(
        &self,
        categorizer_id: &str,
        locator: ImageLocator<'_>,
    ) -> Result<SafetyReport, ProviderError>;
}
