use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作答状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/worksheet.ts")]
pub enum WorksheetStatus {
    Uploaded,
    Analyzing,
    Completed,
    Failed,
}

impl std::fmt::Display for WorksheetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorksheetStatus::Uploaded => write!(f, "uploaded"),
            WorksheetStatus::Analyzing => write!(f, "analyzing"),
            WorksheetStatus::Completed => write!(f, "completed"),
            WorksheetStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for WorksheetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploaded" => Ok(WorksheetStatus::Uploaded),
            "analyzing" => Ok(WorksheetStatus::Analyzing),
            "completed" => Ok(WorksheetStatus::Completed),
            "failed" => Ok(WorksheetStatus::Failed),
            _ => Err(format!("Invalid worksheet status: {s}")),
        }
    }
}

// 学生上传的作答文件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/worksheet.ts")]
pub struct Worksheet {
    pub id: i64,
    pub student_id: i64,
    pub assignment_id: Option<i64>,
    pub answer_key_id: Option<i64>,
    pub answer_key_url: Option<String>,
    pub file_name: String,
    pub file_url: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub storage_bucket: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub storage_path: String,
    pub status: WorksheetStatus,
    pub score: Option<i32>,
    pub weak_topics: Option<Vec<String>>,
    pub ai_suggestions: Option<Vec<String>>,
    pub upload_date: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 新建作答记录所需字段
#[derive(Debug, Clone)]
pub struct NewWorksheet {
    pub student_id: i64,
    pub assignment_id: Option<i64>,
    pub answer_key_id: Option<i64>,
    pub answer_key_url: Option<String>,
    pub file_name: String,
    pub file_url: String,
    pub storage_bucket: String,
    pub storage_path: String,
    pub status: WorksheetStatus,
    pub analysis: Option<WorksheetAnalysis>,
}

/// 分析结果中需要落库的部分
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetAnalysis {
    pub score: i32,
    pub weak_topics: Vec<String>,
    pub suggestions: Vec<String>,
}

impl From<&crate::models::analysis::AnalysisResult> for WorksheetAnalysis {
    fn from(result: &crate::models::analysis::AnalysisResult) -> Self {
        Self {
            score: result.score,
            weak_topics: result.weak_topics.clone(),
            suggestions: result.suggestions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            WorksheetStatus::Uploaded,
            WorksheetStatus::Analyzing,
            WorksheetStatus::Completed,
            WorksheetStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<WorksheetStatus>(), Ok(status));
        }
        assert!("graded".parse::<WorksheetStatus>().is_err());
    }
}
