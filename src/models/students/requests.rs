use serde::Deserialize;
use ts_rs::TS;

use crate::errors::{Result, TutorHubError};

// 创建/更新学生请求
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentRequest {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub weak_topics: Option<Vec<String>>,
    pub avatar: Option<String>,
}

/// 校验后的学生数据
#[derive(Debug, Clone)]
pub struct StudentInput {
    pub name: String,
    pub grade: String,
    pub subjects: Vec<String>,
    pub weak_topics: Vec<String>,
    pub avatar: Option<String>,
}

impl StudentRequest {
    pub fn validate(self) -> Result<StudentInput> {
        let name = self.name.map(|s| s.trim().to_string()).unwrap_or_default();
        let grade = self.grade.map(|s| s.trim().to_string()).unwrap_or_default();
        let subjects: Vec<String> = self
            .subjects
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if name.is_empty() || grade.is_empty() || subjects.is_empty() {
            return Err(TutorHubError::validation(
                "Name, grade, and subjects are required",
            ));
        }

        Ok(StudentInput {
            name,
            grade,
            subjects,
            weak_topics: self.weak_topics.unwrap_or_default(),
            avatar: self.avatar.filter(|a| !a.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> StudentRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_validate_ok_defaults_weak_topics() {
        let input = request(serde_json::json!({
            "name": " Mia ",
            "grade": "5",
            "subjects": ["Math", "Science"]
        }))
        .validate()
        .unwrap();
        assert_eq!(input.name, "Mia");
        assert_eq!(input.subjects, vec!["Math", "Science"]);
        assert!(input.weak_topics.is_empty());
        assert!(input.avatar.is_none());
    }

    #[test]
    fn test_validate_reads_camel_case_weak_topics() {
        let input = request(serde_json::json!({
            "name": "Leo",
            "grade": "7",
            "subjects": ["Math"],
            "weakTopics": ["Fractions"]
        }))
        .validate()
        .unwrap();
        assert_eq!(input.weak_topics, vec!["Fractions"]);
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert!(request(serde_json::json!({"name": "Leo", "grade": "7"}))
            .validate()
            .is_err());
        assert!(request(serde_json::json!({"name": "Leo", "grade": "7", "subjects": []}))
            .validate()
            .is_err());
        assert!(request(serde_json::json!({"grade": "7", "subjects": ["Math"]}))
            .validate()
            .is_err());
    }
}
