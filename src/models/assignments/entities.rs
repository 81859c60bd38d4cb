use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub created_by: i64,
    pub title: String,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub due_date: Option<String>,
    pub answer_key_id: Option<i64>,
    pub answer_key_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 新建作业所需字段
#[derive(Debug, Clone, Default)]
pub struct NewAssignment {
    pub created_by: i64,
    pub title: String,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub due_date: Option<String>,
    pub answer_key_id: Option<i64>,
    pub answer_key_url: Option<String>,
}
