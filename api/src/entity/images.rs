use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub label: Option<String>,
    pub source_type: String,
    pub source_url: Option<String>,
    pub source_file_name: Option<String>,
    pub source_bytes: Option<Vec<u8>>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub detected_objects: Option<Json>,
    pub moderation_state: String,
    pub blacklisted: bool,
    pub upload_id: Option<String>,
    pub upload_status: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
