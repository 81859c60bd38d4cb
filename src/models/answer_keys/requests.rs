use serde::Deserialize;
use ts_rs::TS;

// 答案列表筛选参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer_key.ts")]
pub struct AnswerKeyQuery {
    pub subject: Option<String>,
    pub grade: Option<String>,
}
