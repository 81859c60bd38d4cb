use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生实体，归属于创建它的导师
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub teacher_id: i64,
    pub name: String,
    pub grade: String,
    pub subjects: Vec<String>,
    pub weak_topics: Vec<String>,
    pub avatar: Option<String>,
    pub last_activity: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
