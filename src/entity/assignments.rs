//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub created_by: i64,
    pub title: String,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub due_date: Option<String>,
    pub answer_key_id: Option<i64>,
    pub answer_key_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(
        belongs_to = "super::answer_keys::Entity",
        from = "Column::AnswerKeyId",
        to = "super::answer_keys::Column::Id"
    )]
    AnswerKey,
    #[sea_orm(has_many = "super::assignment_students::Entity")]
    AssignmentStudents,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::answer_keys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnswerKey.def()
    }
}

impl Related<super::assignment_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignmentStudents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::Assignment;
        use chrono::{DateTime, Utc};

        Assignment {
            id: self.id,
            created_by: self.created_by,
            title: self.title,
            subject: self.subject,
            grade: self.grade,
            due_date: self.due_date,
            answer_key_id: self.answer_key_id,
            answer_key_url: self.answer_key_url,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
