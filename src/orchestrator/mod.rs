//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! app (命令分发、教学设置)
//!     ↓
//! workflow::GradingJob (一次评分的完整生命周期)
//!     ↓
//! services (能力层：history / library / settings / status)
//!     ↓
//! clients + infrastructure (评分服务、本地存储)
//! ```

pub mod app;
pub mod command;

pub use app::App;
pub use command::{Command, USAGE};
