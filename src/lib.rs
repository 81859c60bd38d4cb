//! TutorHub - 辅导平台后端服务
//!
//! 基于 Actix Web 构建，管理导师的学生与作业，并通过 LLM 批改学生作答、生成练习题。
//!
//! # 架构
//! - `blob`: 对象存储（按 bucket 存放上传文件）
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（含 AI 批改与文本提取）
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod blob;
pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
