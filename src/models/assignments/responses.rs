use serde::Serialize;
use ts_rs::TS;

use super::entities::Assignment;
use crate::models::answer_keys::entities::AnswerKey;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignedStudent {
    pub id: i64,
    pub name: String,
    pub grade: String,
}

// 作业详情：附带答案与已分配学生
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub answer_key: Option<AnswerKey>,
    pub students: Vec<AssignedStudent>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignStudentsResponse {
    pub assigned: Vec<i64>,
    pub skipped: Vec<i64>,
}
