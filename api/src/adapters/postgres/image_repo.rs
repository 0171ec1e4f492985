//! PostgreSQL adapter for ImageRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::domain::entities::{
    ImageId, ImageSource, ImageSubmission, SourceKind, UploadReference,
};
use crate::domain::ports::{ImageFilter, ImageRepository};
use crate::entity::images;
use crate::error::DomainError;

/// PostgreSQL implementation of ImageRepository
pub struct PostgresImageRepository {
    db: DatabaseConnection,
}

impl PostgresImageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn labels_json(image: &ImageSubmission) -> Result<Option<serde_json::Value>, DomainError> {
    image
        .detected_labels()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| DomainError::Internal(e.to_string()))
}

/// Escape LIKE wildcards so user input matches literally
fn like_pattern(object: &str) -> String {
    let escaped = object
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ImageRepository for PostgresImageRepository {
    async fn find_by_id(&self, id: &ImageId) -> Result<Option<ImageSubmission>, DomainError> {
        let result = images::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(ImageSubmission::try_from).transpose()
    }

    async fn create(&self, image: &ImageSubmission) -> Result<(), DomainError> {
        let now = Utc::now().fixed_offset();
        let (source_url, source_file_name, source_bytes) = match image.source() {
            ImageSource::Upload { bytes, file_name } => {
                (None, Some(file_name.clone()), Some(bytes.clone()))
            }
            ImageSource::Url(url) => (Some(url.clone()), None, None),
        };

        let model = images::ActiveModel {
            id: Set(image.id.0),
            label: Set(image.label.clone()),
            source_type: Set(image.source_kind().to_string()),
            source_url: Set(source_url),
            source_file_name: Set(source_file_name),
            source_bytes: Set(source_bytes),
            detected_objects: Set(labels_json(image)?),
            moderation_state: Set(image.moderation_state().to_string()),
            blacklisted: Set(image.is_blacklisted()),
            upload_id: Set(image.upload().map(|u| u.upload_id.clone())),
            upload_status: Set(image.upload().map(|u| u.status.clone())),
            created_at: Set(image.created_at.fixed_offset()),
            updated_at: Set(now),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn save(&self, image: &ImageSubmission) -> Result<(), DomainError> {
        images::ActiveModel {
            id: Set(image.id.0),
            detected_objects: Set(labels_json(image)?),
            moderation_state: Set(image.moderation_state().to_string()),
            blacklisted: Set(image.is_blacklisted()),
            upload_id: Set(image.upload().map(|u| u.upload_id.clone())),
            upload_status: Set(image.upload().map(|u| u.status.clone())),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => {
                DomainError::NotFound(format!("image {}", image.id))
            }
            e => DomainError::Database(e.to_string()),
        })?;

        Ok(())
    }

    async fn list(
        &self,
        filter: &ImageFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<ImageSubmission>, DomainError> {
        let mut query = images::Entity::find();

        if let Some(state) = filter.state {
            query = query.filter(images::Column::ModerationState.eq(state.to_string()));
        }

        if let Some(after) = filter.created_after {
            query = query.filter(images::Column::CreatedAt.gte(after.fixed_offset()));
        }

        if let Some(before) = filter.created_before {
            query = query.filter(images::Column::CreatedAt.lt(before.fixed_offset()));
        }

        if let Some(object) = filter.object.as_deref().filter(|o| !o.is_empty()) {
            query = query.filter(Expr::cust_with_values(
                "EXISTS (SELECT 1 FROM jsonb_array_elements_text(images.detected_objects) AS label \
                 WHERE label ILIKE $1)",
                [like_pattern(object)],
            ));
        }

        let results = query
            .order_by_asc(images::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(ImageSubmission::try_from).collect()
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<images::Model> for ImageSubmission {
    type Error = DomainError;

    fn try_from(model: images::Model) -> Result<Self, Self::Error> {
        let kind: SourceKind = model.source_type.parse().map_err(DomainError::Database)?;
        let source = match kind {
            SourceKind::Upload => ImageSource::Upload {
                bytes: model.source_bytes.unwrap_or_default(),
                file_name: model.source_file_name.unwrap_or_default(),
            },
            SourceKind::Url => ImageSource::Url(model.source_url.ok_or_else(|| {
                DomainError::Database(format!("image {} has no source url", model.id))
            })?),
        };

        let upload = model.upload_id.map(|upload_id| UploadReference {
            upload_id,
            status: model.upload_status.unwrap_or_default(),
        });

        let detected_labels = model
            .detected_objects
            .map(serde_json::from_value::<Vec<String>>)
            .transpose()
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(ImageSubmission::from_parts(
            ImageId(model.id),
            model.label,
            model.created_at.with_timezone(&Utc),
            source,
            upload,
            detected_labels,
            model.moderation_state.parse().map_err(DomainError::Database)?,
        ))
    }
}
