//! 作答批改流程：提取文本后交给 AI 比对

use crate::blob::ObjectStore;
use crate::errors::{Result, TutorHubError};
use crate::models::analysis::AnalysisResult;
use crate::models::answer_keys::entities::AnswerKey;
use crate::services::ai::{LlmClient, analyze_worksheet};
use crate::services::extract::extract_text_blocking;

/// 读取已存储答案的文本
pub async fn answer_key_text(object_store: &dyn ObjectStore, key: &AnswerKey) -> Result<String> {
    let data = object_store
        .get(&key.storage_bucket, &key.storage_path)
        .await?
        .ok_or_else(|| {
            TutorHubError::text_extraction(format!("Answer key file {} is missing", key.file_name))
        })?;
    extract_text_blocking(key.file_name.clone(), data).await
}

/// 批改作答，文本提取失败时返回错误，LLM 失败时由 AI 层兜底
pub async fn grade(
    llm: Option<&LlmClient>,
    worksheet_name: &str,
    worksheet_data: &[u8],
    answer_key_text: &str,
) -> Result<AnalysisResult> {
    let worksheet_text =
        extract_text_blocking(worksheet_name.to_string(), worksheet_data.to_vec()).await?;
    Ok(analyze_worksheet(llm, &worksheet_text, answer_key_text).await)
}

/// 读取答案文本后批改
pub async fn grade_with_answer_key(
    llm: Option<&LlmClient>,
    object_store: &dyn ObjectStore,
    key: &AnswerKey,
    worksheet_name: &str,
    worksheet_data: &[u8],
) -> Result<AnalysisResult> {
    let key_text = answer_key_text(object_store, key).await?;
    grade(llm, worksheet_name, worksheet_data, &key_text).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::LocalObjectStore;

    #[tokio::test]
    async fn test_grade_without_llm_returns_mock() {
        let result = grade(None, "work.txt", b"1/2 + 1/4 = 2/6", "3/4").await.unwrap();
        assert_eq!(result, AnalysisResult::mock());
    }

    #[tokio::test]
    async fn test_grade_image_is_unsupported() {
        let err = grade(None, "scan.png", b"\x89PNG", "key").await.unwrap_err();
        assert_eq!(err.code(), "E016");
    }

    #[tokio::test]
    async fn test_answer_key_text_missing_object() {
        let root = std::env::temp_dir().join(format!("tutorhub-grading-{}", uuid::Uuid::new_v4()));
        let store = LocalObjectStore::new(&root, "http://localhost:3001");
        let key = AnswerKey {
            id: 1,
            uploader_id: 1,
            file_name: "key.txt".to_string(),
            file_url: String::new(),
            storage_bucket: "assignments".to_string(),
            storage_path: "answer-keys/1_key.txt".to_string(),
            subject: None,
            grade: None,
            upload_date: chrono::Utc::now(),
        };
        assert!(answer_key_text(&store, &key).await.is_err());

        store
            .put("assignments", "answer-keys/1_key.txt", b"1. 3/4")
            .await
            .unwrap();
        assert_eq!(answer_key_text(&store, &key).await.unwrap(), "1. 3/4");
        let _ = std::fs::remove_dir_all(root);
    }
}
