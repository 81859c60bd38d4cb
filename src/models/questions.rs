use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 针对薄弱知识点的练习题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct PracticeQuestion {
    pub topic: String,
    pub question: String,
}

impl PracticeQuestion {
    /// LLM 输出无法解析时使用的占位题目
    pub fn placeholder(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            question: format!("Practice question for {topic}: ..."),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct GeneratedQuestionsResponse {
    pub questions: Vec<PracticeQuestion>,
}
