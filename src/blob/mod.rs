//! 对象存储
//!
//! 上传的答案与作答文件按 `bucket/path` 存放，并通过 `/api/files/{bucket}/{path}` 对外提供访问。

pub mod local;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{Result, TutorHubError};

pub use local::LocalObjectStore;

/// 答案文件所在的桶
pub const ASSIGNMENTS_BUCKET: &str = "assignments";
/// 学生作答所在的桶
pub const WORKSHEETS_BUCKET: &str = "worksheets";

const BUCKETS: &[&str] = &[ASSIGNMENTS_BUCKET, WORKSHEETS_BUCKET];

/// 已写入的对象
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bucket: String,
    pub path: String,
    pub public_url: String,
    pub size: usize,
}

#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// 写入对象，已存在时覆盖
    async fn put(&self, bucket: &str, path: &str, data: &[u8]) -> Result<StoredObject>;
    /// 读取对象，不存在时返回 None
    async fn get(&self, bucket: &str, path: &str) -> Result<Option<Vec<u8>>>;
    /// 删除对象，返回是否确实删除
    async fn remove(&self, bucket: &str, path: &str) -> Result<bool>;
    /// 对象的公开访问地址
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// 删除未能登记的对象，失败时仅记录日志
pub async fn discard_object(object_store: &dyn ObjectStore, bucket: &str, path: &str) {
    if let Err(e) = object_store.remove(bucket, path).await {
        tracing::warn!("Failed to remove orphaned object {}/{}: {}", bucket, path, e);
    }
}

pub fn create_object_store(config: &AppConfig) -> Arc<dyn ObjectStore> {
    Arc::new(LocalObjectStore::new(
        &config.upload.dir,
        &config.upload.public_base_url,
    ))
}

/// 校验桶名与对象路径，拒绝目录穿越
pub fn validate_location(bucket: &str, path: &str) -> Result<()> {
    if !BUCKETS.contains(&bucket) {
        return Err(TutorHubError::validation(format!("Unknown bucket: {bucket}")));
    }

    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if invalid {
        return Err(TutorHubError::validation(format!("Invalid object path: {path}")));
    }

    Ok(())
}

/// 文件名只保留安全字符
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// 答案文件路径：`answer-keys/{ts}_{name}`
pub fn answer_key_path(file_name: &str) -> String {
    format!(
        "answer-keys/{}_{}",
        chrono::Utc::now().timestamp_millis(),
        sanitize_file_name(file_name)
    )
}

/// 作答文件路径：`worksheets/{student_id}/{ts}_{name}`
pub fn worksheet_path(student_id: i64, file_name: &str) -> String {
    format!(
        "worksheets/{student_id}/{}_{}",
        chrono::Utc::now().timestamp_millis(),
        sanitize_file_name(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_location() {
        assert!(validate_location("worksheets", "worksheets/3/1_a.pdf").is_ok());
        assert!(validate_location("photos", "a.pdf").is_err());
        assert!(validate_location("worksheets", "../etc/passwd").is_err());
        assert!(validate_location("worksheets", "/abs.pdf").is_err());
        assert!(validate_location("worksheets", "a//b.pdf").is_err());
        assert!(validate_location("worksheets", "").is_err());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("my work (1).pdf"), "my_work__1_.pdf");
        assert_eq!(sanitize_file_name("../../secret.txt"), "secret.txt");
        assert_eq!(sanitize_file_name("C:\\docs\\key.docx"), "key.docx");
        assert_eq!(sanitize_file_name(".."), "file");
    }

    #[test]
    fn test_object_paths() {
        let key = answer_key_path("key.pdf");
        assert!(key.starts_with("answer-keys/"));
        assert!(key.ends_with("_key.pdf"));
        assert!(validate_location(ASSIGNMENTS_BUCKET, &key).is_ok());

        let ws = worksheet_path(7, "mia.docx");
        assert!(ws.starts_with("worksheets/7/"));
        assert!(validate_location(WORKSHEETS_BUCKET, &ws).is_ok());
    }
}
