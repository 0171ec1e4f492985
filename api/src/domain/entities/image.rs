//! Image domain entity
//!
//! An image submitted for tagging and moderation. A submission starts pending,
//! optionally gains a provider upload reference, then its detected labels, and
//! finally settles as accepted or blacklisted. Each step happens once.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// File extensions accepted for direct uploads
pub const ALLOWED_UPLOAD_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Longest human label accepted, in characters
pub const MAX_LABEL_CHARS: usize = 100;

/// Unique identifier for an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ImageId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the image bytes come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Upload,
    Url,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Upload => write!(f, "upload"),
            SourceKind::Url => write!(f, "url"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upload" => Ok(SourceKind::Upload),
            "url" => Ok(SourceKind::Url),
            _ => Err(format!("Unknown source kind: {}", s)),
        }
    }
}

/// Moderation outcome of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationState {
    Pending,
    Accepted,
    Blacklisted,
}

impl ModerationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ModerationState::Pending)
    }
}

impl std::fmt::Display for ModerationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationState::Pending => write!(f, "pending"),
            ModerationState::Accepted => write!(f, "accepted"),
            ModerationState::Blacklisted => write!(f, "blacklisted"),
        }
    }
}

impl std::str::FromStr for ModerationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ModerationState::Pending),
            "accepted" => Ok(ModerationState::Accepted),
            "blacklisted" => Ok(ModerationState::Blacklisted),
            _ => Err(format!("Unknown moderation state: {}", s)),
        }
    }
}

/// Provider-side handle for uploaded image bytes.
///
/// Imagga keeps uploads for 24 hours; nothing here tracks that window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReference {
    pub upload_id: String,
    /// Status reported by the provider, e.g. "success"
    pub status: String,
}

/// Image payload: raw bytes or a remote URL, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Upload { bytes: Vec<u8>, file_name: String },
    Url(String),
}

impl ImageSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            ImageSource::Upload { .. } => SourceKind::Upload,
            ImageSource::Url(_) => SourceKind::Url,
        }
    }
}

/// How the provider should find an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLocator<'a> {
    UploadId(&'a str),
    Url(&'a str),
}

/// Data needed to create a new image submission
#[derive(Debug, Clone, Default)]
pub struct NewImage {
    pub label: Option<String>,
    pub bytes: Option<Vec<u8>>,
    pub file_name: Option<String>,
    pub source_url: Option<String>,
}

impl NewImage {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            source_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes: Some(bytes),
            file_name: Some(file_name.into()),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Resolve the payload into exactly one source
    pub fn into_source(self) -> Result<(Option<String>, ImageSource), DomainError> {
        let source = match (self.bytes, self.source_url) {
            (Some(_), Some(_)) => {
                return Err(DomainError::InvalidSubmission(
                    "provide either image bytes or a source URL, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(DomainError::InvalidSubmission(
                    "an image requires either bytes or a source URL".to_string(),
                ))
            }
            (Some(bytes), None) => {
                if bytes.is_empty() {
                    return Err(DomainError::InvalidSubmission(
                        "uploaded image is empty".to_string(),
                    ));
                }
                let file_name = self.file_name.unwrap_or_else(|| "image.jpg".to_string());
                validate_extension(&file_name)?;
                ImageSource::Upload { bytes, file_name }
            }
            (None, Some(url)) => {
                let url = url.trim().to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(DomainError::InvalidSubmission(format!(
                        "source URL must be http(s): '{}'",
                        url
                    )));
                }
                ImageSource::Url(url)
            }
        };

        let label = self.label.filter(|l| !l.trim().is_empty());
        if let Some(ref l) = label {
            if l.chars().count() > MAX_LABEL_CHARS {
                return Err(DomainError::Validation(
                    format!("label must be at most {} characters", MAX_LABEL_CHARS),
                ));
            }
        }

        Ok((label, source))
    }
}

fn validate_extension(file_name: &str) -> Result<(), DomainError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if ALLOWED_UPLOAD_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(DomainError::InvalidSubmission(format!(
            "unsupported file type '{}', expected one of: {}",
            file_name,
            ALLOWED_UPLOAD_EXTENSIONS.join(", ")
        )))
    }
}

/// An image submission and its moderation lifecycle
#[derive(Debug, Clone)]
pub struct ImageSubmission {
    pub id: ImageId,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
    source: ImageSource,
    upload: Option<UploadReference>,
    detected_labels: Option<Vec<String>>,
    moderation_state: ModerationState,
}

impl ImageSubmission {
    /// Create a pending submission from validated input
    pub fn new(new_image: NewImage) -> Result<Self, DomainError> {
        let (label, source) = new_image.into_source()?;

        Ok(Self {
            id: ImageId::new(),
            label,
            created_at: Utc::now(),
            source,
            upload: None,
            detected_labels: None,
            moderation_state: ModerationState::Pending,
        })
    }

    /// Rebuild a submission from storage
    pub fn from_parts(
        id: ImageId,
        label: Option<String>,
        created_at: DateTime<Utc>,
        source: ImageSource,
        upload: Option<UploadReference>,
        detected_labels: Option<Vec<String>>,
        moderation_state: ModerationState,
    ) -> Self {
        Self {
            id,
            label,
            created_at,
            source,
            upload,
            detected_labels,
            moderation_state,
        }
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source.kind()
    }

    pub fn source_url(&self) -> Option<&str> {
        match &self.source {
            ImageSource::Url(url) => Some(url),
            ImageSource::Upload { .. } => None,
        }
    }

    pub fn upload(&self) -> Option<&UploadReference> {
        self.upload.as_ref()
    }

    pub fn detected_labels(&self) -> Option<&[String]> {
        self.detected_labels.as_deref()
    }

    pub fn moderation_state(&self) -> ModerationState {
        self.moderation_state
    }

    pub fn is_blacklisted(&self) -> bool {
        self.moderation_state == ModerationState::Blacklisted
    }

    /// Locator for provider lookups.
    ///
    /// Uploads are addressed by upload id once registered, URLs by the URL.
    pub fn locator(&self) -> Option<ImageLocator<'_>> {
        match (&self.source, &self.upload) {
            (ImageSource::Upload { .. }, Some(upload)) => {
                Some(ImageLocator::UploadId(&upload.upload_id))
            }
            (ImageSource::Upload { .. }, None) => None,
            (ImageSource::Url(url), _) => Some(ImageLocator::Url(url)),
        }
    }

    /// Record the provider upload. Only valid once, for pending uploads.
    pub fn attach_upload(&mut self, upload: UploadReference) -> Result<(), DomainError> {
        self.ensure_pending("attach upload")?;
        if self.source_kind() != SourceKind::Upload {
            return Err(DomainError::InvalidTransition(format!(
                "image {} is not an upload",
                self.id
            )));
        }
        if self.upload.is_some() {
            return Err(DomainError::InvalidTransition(format!(
                "image {} already has an upload reference",
                self.id
            )));
        }
        self.upload = Some(upload);
        Ok(())
    }

    /// Record the labels detected by the provider. Only valid once.
    pub fn attach_labels(&mut self, labels: Vec<String>) -> Result<(), DomainError> {
        self.ensure_pending("attach labels")?;
        if self.detected_labels.is_some() {
            return Err(DomainError::InvalidTransition(format!(
                "image {} already has detected labels",
                self.id
            )));
        }
        if self.source_kind() == SourceKind::Upload && self.upload.is_none() {
            return Err(DomainError::InvalidTransition(format!(
                "image {} must be uploaded before it is labelled",
                self.id
            )));
        }
        self.detected_labels = Some(labels);
        Ok(())
    }

    /// Settle the moderation outcome
    pub fn finalize(&mut self, state: ModerationState) -> Result<(), DomainError> {
        self.ensure_pending("finalize")?;
        if !state.is_terminal() {
            return Err(DomainError::InvalidTransition(format!(
                "image {} cannot be finalized as {}",
                self.id, state
            )));
        }
        if self.detected_labels.is_none() {
            return Err(DomainError::InvalidTransition(format!(
                "image {} has no detected labels yet",
                self.id
            )));
        }
        self.moderation_state = state;
        Ok(())
    }

    fn ensure_pending(&self, action: &str) -> Result<(), DomainError> {
        if self.moderation_state.is_terminal() {
            return Err(DomainError::InvalidTransition(format!(
                "cannot {} on image {}: already {}",
                action, self.id, self.moderation_state
            )));
        }
        Ok(())
    }
}
