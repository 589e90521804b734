//! # GradeWise
//!
//! AI 评分前端：把学生提交、评分标准交给评分服务，展示结果并保存评分历史
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 本地键值存储，值为 JSON 文本
//! - `KeyValueStore` - 存储接口；`FileStore` / `MemoryStore` 两种实现
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - 评分服务 HTTP 接口
//! - `GradingGateway` - grade / extract-text / parse-rubric / ingest 四个能力
//!
//! ### ③ 业务能力层（Services）
//! - `HistoryService` - 评分历史的读写、搜索和统计
//! - `LibraryService` - 导入的评分标准和课程材料
//! - `SettingsService` - 个人资料与教学设置
//! - `StatusCycler` - 评分中的进度文案轮播
//!
//! ### ④ 流程层（Workflow）
//! - `GradingJob` - 一次评分的状态机（校验 → 提交 → 结果 → 保存）
//!
//! ### ⑤ 编排层（Orchestration）
//! - `App` - 命令分发与教学设置
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{GatewayClient, GradingGateway};
pub use config::Config;
pub use error::{AppError, AppResult, GatewayError, StorageError, ValidationError};
pub use infrastructure::{FileStore, KeyValueStore, MemoryStore};
pub use orchestrator::{App, Command};
pub use workflow::{GradingJob, JobPhase, JobSettings, JobSnapshot, SaveOutcome};
