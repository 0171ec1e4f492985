//! Image intake service
//!
//! Runs one submission through the moderation pipeline:
//! 1. Upload sources are registered with the tagging provider
//! 2. Labels are fetched by upload id or by source URL
//! 3. The moderation policy is loaded and, when the NSFW check is on, the
//!    safety categories are fetched
//! 4. The verdict is written to the image record in one update
//!
//! Provider errors propagate unchanged; nothing is retried. Until step 4 the
//! stored record stays pending, so an abandoned request leaves no partial
//! outcome behind (a provider-side upload is not rolled back).

use std::sync::Arc;

use crate::app::moderation::{self, NsfwOutcome};
use crate::app::policy::PolicyLoader;
use crate::domain::entities::{ImageLocator, ImageSource, ImageSubmission, NewImage};
use crate::domain::ports::{ConfigStore, ImageRepository, TaggingProvider};
use crate::error::{AppError, DomainError};

/// Service coordinating tagging, moderation and persistence of submissions
pub struct IntakeService<TP, CS, IR>
where
    TP: TaggingProvider,
    CS: ConfigStore,
    IR: ImageRepository,
{
    tagging: Arc<TP>,
    policy: PolicyLoader<CS>,
    images: Arc<IR>,
}

impl<TP, CS, IR> IntakeService<TP, CS, IR>
where
    TP: TaggingProvider,
    CS: ConfigStore,
    IR: ImageRepository,
{
    pub fn new(
        tagging: Arc<TP>,
        config: Arc<CS>,
        images: Arc<IR>,
        default_safety_threshold: f64,
    ) -> Self {
        Self {
            tagging,
            policy: PolicyLoader::new(config, default_safety_threshold),
            images,
        }
    }

    /// Validate and store a new pending image, then process it
    pub async fn submit(&self, new_image: NewImage) -> Result<ImageSubmission, AppError> {
        let submission = ImageSubmission::new(new_image)?;
        self.images.create(&submission).await?;

        tracing::info!(
            image_id = %submission.id,
            source = %submission.source_kind(),
            "Image submitted"
        );

        self.process_submission(submission).await
    }

    /// Tag and moderate a pending submission.
    ///
    /// Returns the accepted submission, or `AppError::ContentRejected` after
    /// the blacklisted outcome has been stored.
    pub async fn process_submission(
        &self,
        mut submission: ImageSubmission,
    ) -> Result<ImageSubmission, AppError> {
        if submission.moderation_state().is_terminal() {
            return Err(DomainError::InvalidTransition(format!(
                "image {} was already moderated as {}",
                submission.id,
                submission.moderation_state()
            ))
            .into());
        }

        let upload = match submission.source() {
            ImageSource::Upload { bytes, file_name } => {
                Some(self.tagging.register_upload(bytes, file_name).await?)
            }
            ImageSource::Url(_) => None,
        };
        if let Some(upload) = upload {
            tracing::debug!(image_id = %submission.id, upload_id = %upload.upload_id, "Image uploaded");
            submission.attach_upload(upload)?;
        }

        let labels = match submission.locator() {
            Some(ImageLocator::UploadId(upload_id)) => {
                self.tagging.fetch_labels_for_upload(upload_id).await?
            }
            Some(ImageLocator::Url(url)) => self.tagging.fetch_labels_for_url(url).await?,
            None => {
                return Err(DomainError::Internal(format!(
                    "image {} has no provider locator",
                    submission.id
                ))
                .into())
            }
        };
        tracing::debug!(image_id = %submission.id, labels = labels.len(), "Image tagged");
        submission.attach_labels(labels)?;

        let policy = self.policy.load().await?;
        let report = if policy.nsfw_check_enabled {
            let categorizer_id = self.policy.nsfw_categorizer_id().await?;
            match submission.locator() {
                Some(locator) => Some(
                    self.tagging
                        .fetch_safety_categories(&categorizer_id, locator)
                        .await?,
                ),
                None => None,
            }
        } else {
            None
        };

        let verdict = moderation::evaluate(
            submission.detected_labels().unwrap_or_default(),
            report.as_ref(),
            &policy,
        );
        submission.finalize(verdict.state())?;
        self.images.save(&submission).await?;

        let safety_score = match verdict.nsfw {
            NsfwOutcome::Passed { safety_score } | NsfwOutcome::Failed { safety_score } => {
                Some(safety_score)
            }
            NsfwOutcome::Skipped => None,
        };

        if verdict.is_accepted() {
            tracing::info!(image_id = %submission.id, safety_score = ?safety_score, "Image accepted");
            return Ok(submission);
        }

        tracing::warn!(
            image_id = %submission.id,
            blacklisted_labels = ?verdict.blacklisted_hits,
            nsfw_passed = verdict.nsfw.passed(),
            safety_score = ?safety_score,
            threshold = policy.safety_confidence_threshold,
            "Image blacklisted by moderation"
        );

        Err(AppError::ContentRejected(submission.id))
    }
}
