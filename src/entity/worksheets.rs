//! 学生作业（上传的作答文件）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "worksheets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub assignment_id: Option<i64>,
    pub answer_key_id: Option<i64>,
    pub answer_key_url: Option<String>,
    pub file_name: String,
    pub file_url: String,
    pub storage_bucket: String,
    pub storage_path: String,
    pub status: String,
    pub score: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub weak_topics: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ai_suggestions: Option<String>,
    pub upload_date: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_worksheet(self) -> crate::models::worksheets::entities::Worksheet {
        use crate::models::worksheets::entities::{Worksheet, WorksheetStatus};
        use chrono::{DateTime, Utc};

        Worksheet {
            id: self.id,
            student_id: self.student_id,
            assignment_id: self.assignment_id,
            answer_key_id: self.answer_key_id,
            answer_key_url: self.answer_key_url,
            file_name: self.file_name,
            file_url: self.file_url,
            storage_bucket: self.storage_bucket,
            storage_path: self.storage_path,
            status: self
                .status
                .parse::<WorksheetStatus>()
                .unwrap_or(WorksheetStatus::Uploaded),
            score: self.score,
            weak_topics: self.weak_topics.as_deref().map(super::parse_string_list),
            ai_suggestions: self.ai_suggestions.as_deref().map(super::parse_string_list),
            upload_date: DateTime::<Utc>::from_timestamp(self.upload_date, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
