use serde::Deserialize;
use ts_rs::TS;

// 带答案上传作答时的查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/worksheet.ts")]
pub struct WorksheetWithAnswerKeyQuery {
    pub assignment_id: Option<i64>,
}
