//! Image handlers
//!
//! Endpoints for submitting images for moderation and browsing the results.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{ImageId, ImageSubmission, ModerationState, NewImage};
use crate::domain::ports::{ConfigStore, ImageFilter, ImageRepository, TaggingProvider};
use crate::error::AppError;
use crate::AppState;

/// Request body for submitting an image
#[derive(Debug, Deserialize)]
pub struct SubmitImageRequest {
    pub label: Option<String>,
    /// Remote image to tag by URL
    pub image_url: Option<String>,
    /// Image bytes, base64 encoded (a `data:` URL prefix is accepted)
    pub image_base64: Option<String>,
    /// Original file name of the uploaded bytes; its extension is validated
    pub file_name: Option<String>,
}

/// Query parameters for listing images
#[derive(Debug, Deserialize)]
pub struct ListImagesQuery {
    /// Case-insensitive substring of a detected label
    pub object: Option<String>,
    /// pending, accepted or blacklisted
    pub state: Option<String>,
    /// RFC 3339 timestamp, inclusive
    pub created_after: Option<DateTime<Utc>>,
    /// RFC 3339 timestamp, exclusive
    pub created_before: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    20
}

const MAX_LIMIT: u64 = 100;

/// Image as returned by the API
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub id: String,
    pub label: Option<String>,
    pub source_type: String,
    pub source_url: Option<String>,
    pub detected_objects: Option<Vec<String>>,
    pub moderation_state: String,
    pub blacklisted: bool,
    pub upload_id: Option<String>,
    pub upload_status: Option<String>,
    pub created_at: String,
}

impl From<&ImageSubmission> for ImageResponse {
    fn from(image: &ImageSubmission) -> Self {
        Self {
            id: image.id.to_string(),
            label: image.label.clone(),
            source_type: image.source_kind().to_string(),
            source_url: image.source_url().map(str::to_string),
            detected_objects: image.detected_labels().map(<[String]>::to_vec),
            moderation_state: image.moderation_state().to_string(),
            blacklisted: image.is_blacklisted(),
            upload_id: image.upload().map(|u| u.upload_id.clone()),
            upload_status: image.upload().map(|u| u.status.clone()),
            created_at: image.created_at.to_rfc3339(),
        }
    }
}

fn decode_image(encoded: &str) -> Result<Vec<u8>, AppError> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::BadRequest(format!("image_base64 is not valid base64: {}", e)))
}

impl SubmitImageRequest {
    fn into_new_image(self) -> Result<NewImage, AppError> {
        let bytes = self
            .image_base64
            .as_deref()
            .map(decode_image)
            .transpose()?;

        Ok(NewImage {
            label: self.label,
            bytes,
            file_name: self.file_name,
            source_url: self.image_url,
        })
    }
}

/// POST /images
///
/// Submit an image by URL or base64 bytes. The image is tagged and moderated
/// before the response is sent; a blacklisted image is stored but answered
/// with 422.
pub async fn submit_image<TP, CS, IR>(
    State(state): State<AppState<TP, CS, IR>>,
    Json(request): Json<SubmitImageRequest>,
) -> Result<(StatusCode, Json<ImageResponse>), AppError>
where
    TP: TaggingProvider + 'static,
    CS: ConfigStore + 'static,
    IR: ImageRepository + 'static,
{
    let new_image = request.into_new_image()?;
    let image = state.intake_service.submit(new_image).await?;

    Ok((StatusCode::CREATED, Json(ImageResponse::from(&image))))
}

/// GET /images/:id
pub async fn get_image<TP, CS, IR>(
    State(state): State<AppState<TP, CS, IR>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ImageResponse>, AppError>
where
    TP: TaggingProvider + 'static,
    CS: ConfigStore + 'static,
    IR: ImageRepository + 'static,
{
    let image = state
        .images
        .find_by_id(&ImageId(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Image {} not found", id)))?;

    Ok(Json(ImageResponse::from(&image)))
}

/// GET /images
///
/// List images, oldest first. `object` matches any detected label by
/// case-insensitive substring.
pub async fn list_images<TP, CS, IR>(
    State(state): State<AppState<TP, CS, IR>>,
    Query(query): Query<ListImagesQuery>,
) -> Result<Json<Vec<ImageResponse>>, AppError>
where
    TP: TaggingProvider + 'static,
    CS: ConfigStore + 'static,
    IR: ImageRepository + 'static,
{
    let moderation_state = query
        .state
        .as_deref()
        .map(str::parse::<ModerationState>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    if let (Some(after), Some(before)) = (query.created_after, query.created_before) {
        if after >= before {
            return Err(AppError::BadRequest(
                "created_after must be earlier than created_before".to_string(),
            ));
        }
    }

    let filter = ImageFilter {
        object: query
            .object
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty()),
        state: moderation_state,
        created_after: query.created_after,
        created_before: query.created_before,
    };

    let images = state
        .images
        .list(&filter, query.limit.min(MAX_LIMIT), query.offset)
        .await?;

    Ok(Json(images.iter().map(ImageResponse::from).collect()))
}
