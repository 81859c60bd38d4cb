//! 答案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "answer_keys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub uploader_id: i64,
    pub file_name: String,
    pub file_url: String,
    pub storage_bucket: String,
    pub storage_path: String,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub upload_date: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UploaderId",
        to = "super::users::Column::Id"
    )]
    Uploader,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer_key(self) -> crate::models::answer_keys::entities::AnswerKey {
        use crate::models::answer_keys::entities::AnswerKey;
        use chrono::{DateTime, Utc};

        AnswerKey {
            id: self.id,
            uploader_id: self.uploader_id,
            file_name: self.file_name,
            file_url: self.file_url,
            storage_bucket: self.storage_bucket,
            storage_path: self.storage_path,
            subject: self.subject,
            grade: self.grade,
            upload_date: DateTime::<Utc>::from_timestamp(self.upload_date, 0).unwrap_or_default(),
        }
    }
}
