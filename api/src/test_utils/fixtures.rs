//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use crate::domain::entities::{
    ImageSubmission, ModerationState, NewImage, SafetyCategory, SafetyReport,
};

/// Bytes standing in for an image; providers are mocked so content is opaque
pub const TEST_IMAGE_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

/// A URL submission
pub fn test_url_image() -> NewImage {
    NewImage::from_url("https://example.com/image.jpg")
}

/// A direct upload submission
pub fn test_upload_image() -> NewImage {
    NewImage::from_bytes(TEST_IMAGE_BYTES.to_vec(), "dog.jpg").with_label("my dog")
}

/// A safety report with the given "safe" confidence and the remainder as "nsfw"
pub fn safety_report_with_safe(confidence: f64) -> SafetyReport {
    SafetyReport::Categories(vec![
        SafetyCategory {
            name: "safe".to_string(),
            confidence,
        },
        SafetyCategory {
            name: "nsfw".to_string(),
            confidence: 100.0 - confidence,
        },
    ])
}

/// A URL image that has already been moderated with the given labels
pub fn test_moderated_image(labels: &[&str], state: ModerationState) -> ImageSubmission {
    let mut image = ImageSubmission::new(NewImage::from_url(format!(
        "https://example.com/{}.jpg",
        labels.first().copied().unwrap_or("empty")
    )))
    .unwrap();
    image
        .attach_labels(labels.iter().map(|s| s.to_string()).collect())
        .unwrap();
    image.finalize(state).unwrap();
    image
}
