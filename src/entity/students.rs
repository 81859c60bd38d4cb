//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub name: String,
    pub grade: String,
    #[sea_orm(column_type = "Text")]
    pub subjects: String,
    #[sea_orm(column_type = "Text")]
    pub weak_topics: String,
    pub avatar: Option<String>,
    pub last_activity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::worksheets::Entity")]
    Worksheets,
    #[sea_orm(has_many = "super::assignment_students::Entity")]
    AssignmentStudents,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::worksheets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Worksheets.def()
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
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::Student;
        use chrono::{DateTime, Utc};

        Student {
            id: self.id,
            teacher_id: self.teacher_id,
            name: self.name,
            grade: self.grade,
            subjects: super::parse_string_list(&self.subjects),
            weak_topics: super::parse_string_list(&self.weak_topics),
            avatar: self.avatar,
            last_activity: DateTime::<Utc>::from_timestamp(self.last_activity, 0)
                .unwrap_or_default(),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
