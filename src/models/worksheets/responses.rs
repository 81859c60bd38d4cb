use serde::Serialize;
use ts_rs::TS;

use super::entities::Worksheet;
use crate::models::analysis::AnalysisResult;

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/worksheet.ts")]
pub struct WorksheetAnalysisResponse {
    pub message: String,
    pub ai_result: AnalysisResult,
    pub worksheet: Worksheet,
}
