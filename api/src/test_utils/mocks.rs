//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    ImageId, ImageLocator, ImageSubmission, SafetyCategory, SafetyReport, UploadReference,
};
use crate::domain::ports::{ConfigStore, ImageFilter, ImageRepository, TaggingProvider};
use crate::error::{DomainError, ProviderError};

// ============================================================================
// Mock Tagging Provider
// ============================================================================

/// A mock tagging provider that tracks calls and returns configurable responses
pub struct MockTaggingProvider {
    upload_id: Arc<RwLock<String>>,
    labels: Arc<RwLock<Vec<String>>>,
    safety_report: Arc<RwLock<SafetyReport>>,
    upload_error: Arc<RwLock<Option<ProviderError>>>,
    labels_error: Arc<RwLock<Option<ProviderError>>>,
    safety_error: Arc<RwLock<Option<ProviderError>>>,
    /// File names passed to `register_upload`
    pub uploads: Arc<RwLock<Vec<String>>>,
    /// "upload:<id>" or "url:<url>" per label lookup
    label_lookups: Arc<RwLock<Vec<String>>>,
    /// "<categorizer>:upload:<id>" or "<categorizer>:url:<url>" per safety lookup
    safety_lookups: Arc<RwLock<Vec<String>>>,
}

impl Default for MockTaggingProvider {
    fn default() -> Self {
        Self {
            upload_id: Arc::new(RwLock::new("12345".to_string())),
            labels: Arc::new(RwLock::new(vec!["dog".to_string(), "cat".to_string()])),
            safety_report: Arc::new(RwLock::new(SafetyReport::Categories(vec![
                SafetyCategory {
                    name: "safe".to_string(),
                    confidence: 99.0,
                },
                SafetyCategory {
                    name: "nsfw".to_string(),
                    confidence: 1.0,
                },
            ]))),
            upload_error: Arc::new(RwLock::new(None)),
            labels_error: Arc::new(RwLock::new(None)),
            safety_error: Arc::new(RwLock::new(None)),
            uploads: Arc::new(RwLock::new(Vec::new())),
            label_lookups: Arc::new(RwLock::new(Vec::new())),
            safety_lookups: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl MockTaggingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upload_id(self, upload_id: &str) -> Self {
        *self.upload_id.write().unwrap() = upload_id.to_string();
        self
    }

    pub fn with_labels(self, labels: &[&str]) -> Self {
        *self.labels.write().unwrap() = labels.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_safety_report(self, report: SafetyReport) -> Self {
        *self.safety_report.write().unwrap() = report;
        self
    }

    pub fn failing_upload(self, error: ProviderError) -> Self {
        *self.upload_error.write().unwrap() = Some(error);
        self
    }

    pub fn failing_labels(self, error: ProviderError) -> Self {
        *self.labels_error.write().unwrap() = Some(error);
        self
    }

    pub fn failing_safety(self, error: ProviderError) -> Self {
        *self.safety_error.write().unwrap() = Some(error);
        self
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.read().unwrap().len()
    }

    pub fn label_calls(&self) -> Vec<String> {
        self.label_lookups.read().unwrap().clone()
    }

    pub fn safety_calls(&self) -> Vec<String> {
        self.safety_lookups.read().unwrap().clone()
    }
}

fn locator_key(locator: ImageLocator<'_>) -> String {
    match locator {
        ImageLocator::UploadId(id) => format!("upload:{}", id),
        ImageLocator::Url(url) => format!("url:{}", url),
    }
}

#[async_trait]
impl TaggingProvider for MockTaggingProvider {
    async fn register_upload(
        &self,
        _bytes: &[u8],
        file_name: &str,
    ) -> Result<UploadReference, ProviderError> {
        if let Some(e) = self.upload_error.read().unwrap().clone() {
            return Err(e);
        }
        self.uploads.write().unwrap().push(file_name.to_string());
        Ok(UploadReference {
            upload_id: self.upload_id.read().unwrap().clone(),
            status: "success".to_string(),
        })
    }

    async fn fetch_labels_for_upload(&self, upload_id: &str) -> Result<Vec<String>, ProviderError> {
        self.label_lookups
            .write()
            .unwrap()
            .push(locator_key(ImageLocator::UploadId(upload_id)));
        if let Some(e) = self.labels_error.read().unwrap().clone() {
            return Err(e);
        }
        Ok(self.labels.read().unwrap().clone())
    }

    async fn fetch_labels_for_url(&self, source_url: &str) -> Result<Vec<String>, ProviderError> {
        self.label_lookups
            .write()
            .unwrap()
            .push(locator_key(ImageLocator::Url(source_url)));
        if let Some(e) = self.labels_error.read().unwrap().clone() {
            return Err(e);
        }
        Ok(self.labels.read().unwrap().clone())
    }

    async fn fetch_safety_categories(
        &self,
        categorizer_id: &str,
        locator: ImageLocator<'_>,
    ) -> Result<SafetyReport, ProviderError> {
        self.safety_lookups
            .write()
            .unwrap()
            .push(format!("{}:{}", categorizer_id, locator_key(locator)));
        if let Some(e) = self.safety_error.read().unwrap().clone() {
            return Err(e);
        }
        Ok(self.safety_report.read().unwrap().clone())
    }
}

// ============================================================================
// In-Memory Config Store
// ============================================================================

#[derive(Default)]
pub struct InMemoryConfigStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    flags: Arc<RwLock<HashMap<String, bool>>>,
    values_fail: bool,
    flags_fail: bool,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every lookup fails with a database error
    pub fn failing() -> Self {
        Self {
            values_fail: true,
            flags_fail: true,
            ..Default::default()
        }
    }

    /// Only feature flag lookups fail
    pub fn with_failing_flags(mut self) -> Self {
        self.flags_fail = true;
        self
    }

    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.set_value(key, value);
        self
    }

    pub fn with_flag(self, name: &str, active: bool) -> Self {
        self.set_flag(name, active);
        self
    }

    pub fn set_value(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn set_flag(&self, name: &str, active: bool) {
        self.flags.write().unwrap().insert(name.to_string(), active);
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        if self.values_fail {
            return Err(DomainError::Database("Mock failure".to_string()));
        }
        Ok(self.values.read().unwrap().get(key).cloned())
    }

    async fn feature_flag(&self, name: &str) -> Result<Option<bool>, DomainError> {
        if self.flags_fail {
            return Err(DomainError::Database("Mock failure".to_string()));
        }
        Ok(self.flags.read().unwrap().get(name).copied())
    }
}

// ============================================================================
// In-Memory Image Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryImageRepository {
    images: Arc<RwLock<HashMap<ImageId, ImageSubmission>>>,
    saves: Arc<RwLock<usize>>,
}

impl InMemoryImageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an image for testing
    pub fn with_image(self, image: ImageSubmission) -> Self {
        self.images.write().unwrap().insert(image.id, image);
        self
    }

    pub fn get(&self, id: &ImageId) -> Option<ImageSubmission> {
        self.images.read().unwrap().get(id).cloned()
    }

    /// All stored images, oldest first
    pub fn all(&self) -> Vec<ImageSubmission> {
        let mut images: Vec<_> = self.images.read().unwrap().values().cloned().collect();
        images.sort_by_key(|i| i.created_at);
        images
    }

    pub fn save_count(&self) -> usize {
        *self.saves.read().unwrap()
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn find_by_id(&self, id: &ImageId) -> Result<Option<ImageSubmission>, DomainError> {
        Ok(self.get(id))
    }

    async fn create(&self, image: &ImageSubmission) -> Result<(), DomainError> {
        let mut images = self.images.write().unwrap();
        if images.contains_key(&image.id) {
            return Err(DomainError::Database(format!(
                "duplicate image id {}",
                image.id
            )));
        }
        images.insert(image.id, image.clone());
        Ok(())
    }

    async fn save(&self, image: &ImageSubmission) -> Result<(), DomainError> {
        let mut images = self.images.write().unwrap();
        match images.get_mut(&image.id) {
            Some(stored) => {
                *stored = image.clone();
                *self.saves.write().unwrap() += 1;
                Ok(())
            }
            None => Err(DomainError::NotFound(format!("image {}", image.id))),
        }
    }

    async fn list(
        &self,
        filter: &ImageFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<ImageSubmission>, DomainError> {
        let needle = filter
            .object
            .as_deref()
            .filter(|o| !o.is_empty())
            .map(str::to_lowercase);

        Ok(self
            .all()
            .into_iter()
            .filter(|i| filter.state.map_or(true, |s| i.moderation_state() == s))
            .filter(|i| filter.created_after.map_or(true, |t| i.created_at >= t))
            .filter(|i| filter.created_before.map_or(true, |t| i.created_at < t))
            .filter(|i| match &needle {
                Some(needle) => i
                    .detected_labels()
                    .unwrap_or_default()
                    .iter()
                    .any(|label| label.to_lowercase().contains(needle.as_str())),
                None => true,
            })
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}
