//! AI 批改结果

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 单道题的判定结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analysis.ts")]
pub struct QuestionResult {
    pub number: i32,
    pub question: String,
    pub correct: bool,
}

// 作答与答案比对后的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/analysis.ts")]
pub struct AnalysisResult {
    #[serde(default)]
    pub score: i32,
    #[serde(default, alias = "weak_topics")]
    pub weak_topics: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<QuestionResult>,
}

impl AnalysisResult {
    /// LLM 不可用时返回的演示数据
    pub fn mock() -> Self {
        let question = |number: i32, question: &str, correct: bool| QuestionResult {
            number,
            question: question.to_string(),
            correct,
        };

        Self {
            score: 88,
            weak_topics: vec!["Fractions".to_string(), "Decimals".to_string()],
            suggestions: vec![
                "Review fractions".to_string(),
                "Practice decimal problems".to_string(),
            ],
            questions: vec![
                question(1, "What is 1/2 + 1/4?", true),
                question(2, "Convert 0.75 to a fraction.", false),
                question(3, "Simplify 3/9.", true),
                question(4, "Add 2.5 and 1.3.", false),
            ],
        }
    }

    /// 分数限制在 0..=100
    pub fn clamped(mut self) -> Self {
        self.score = self.score.clamp(0, 100);
        self
    }
}
