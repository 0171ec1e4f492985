//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod image;
pub mod moderation;

pub use image::{
    ImageId, ImageLocator, ImageSource, ImageSubmission, ModerationState, NewImage, SourceKind,
    UploadReference,
};
pub use moderation::{ModerationPolicy, SafetyCategory, SafetyReport};
