use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 答案文件记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer_key.ts")]
pub struct AnswerKey {
    pub id: i64,
    pub uploader_id: i64,
    pub file_name: String,
    pub file_url: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub storage_bucket: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub storage_path: String,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub upload_date: chrono::DateTime<chrono::Utc>,
}

/// 新建答案记录所需字段
#[derive(Debug, Clone)]
pub struct NewAnswerKey {
    pub uploader_id: i64,
    pub file_name: String,
    pub file_url: String,
    pub storage_bucket: String,
    pub storage_path: String,
    pub subject: Option<String>,
    pub grade: Option<String>,
}
