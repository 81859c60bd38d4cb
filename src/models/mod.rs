pub mod analysis;
pub mod answer_keys;
pub mod assignments;
pub mod auth;
pub mod common;
pub mod questions;
pub mod students;
pub mod users;
pub mod worksheets;

pub use common::*;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 业务错误码，随 ApiResponse 一起返回给前端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/error_code.ts")]
pub enum ErrorCode {
    // 通用
    Success = 0,
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    InternalServerError = 1004,
    RateLimitExceeded = 1005,
    ValidationFailed = 1006,
    Conflict = 1007,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,

    // 用户
    UserNotFound = 3000,
    UserEmailInvalid = 3001,
    UserEmailAlreadyExists = 3002,
    UserPasswordInvalid = 3003,
    UserUpdateFailed = 3004,

    // 文件
    FileNotFound = 4000,
    FileUploadFailed = 4001,
    FileTypeNotAllowed = 4002,
    FileSizeExceeded = 4003,
    MultifileUploadNotAllowed = 4004,

    // 学生
    StudentNotFound = 5000,

    // 作业
    AssignmentNotFound = 6000,
    AnswerKeyNotFound = 6001,

    // 学生作答
    WorksheetNotFound = 7000,
    WorksheetAnalysisFailed = 7001,
    NoWeakTopics = 7002,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.as_i32(), 0);
        assert_eq!(ErrorCode::NotFound.as_i32(), 1003);
        assert_eq!(ErrorCode::NoWeakTopics.as_i32(), 7002);
    }

    #[test]
    fn test_api_response_envelope() {
        let resp = ApiResponse::error_empty(ErrorCode::StudentNotFound, "Student not found");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["code"], 5000);
        assert_eq!(value["message"], "Student not found");
        assert!(value.get("data").is_none());
        assert!(value.get("timestamp").is_some());
    }
}
