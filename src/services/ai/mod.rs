//! AI 辅助批改
//!
//! 所有调用在失败时都有兜底：批改返回演示数据，出题返回占位题目。

pub mod analysis;
pub mod client;
pub mod questions;

use actix_web::{HttpRequest, web};
use std::sync::Arc;

pub use analysis::analyze_worksheet;
pub use client::LlmClient;
pub use questions::generate_questions;

/// 从 app_data 中取出 LLM 客户端，未注册时返回 None
pub fn llm_client(request: &HttpRequest) -> Option<Arc<LlmClient>> {
    request
        .app_data::<web::Data<Arc<LlmClient>>>()
        .map(|c| c.get_ref().clone())
}
