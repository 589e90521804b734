//! 评分任务状态
//!
//! 封装"这一次评分进行到哪一步、界面上该显示什么"这一信息

use crate::config::Config;
use crate::models::{format_score, total_points, GradeResult, HistoryItem, RubricItem, SaveMeta};
use crate::services::LoadingPhase;
use std::fmt::Display;
use std::time::Duration;

/// 评分任务所处阶段
///
/// `Idle → Validating → Submitting → (Succeeded | Failed) → [Saving → Saved]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
    Saving,
    Saved,
}

impl JobPhase {
    /// 是否有操作正在进行（此时不能再次触发评分）
    pub fn is_busy(self) -> bool {
        matches!(self, JobPhase::Validating | JobPhase::Submitting | JobPhase::Saving)
    }
}

impl Display for JobPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobPhase::Idle => "idle",
            JobPhase::Validating => "validating",
            JobPhase::Submitting => "submitting",
            JobPhase::Succeeded => "succeeded",
            JobPhase::Failed => "failed",
            JobPhase::Saving => "saving",
            JobPhase::Saved => "saved",
        };
        f.write_str(name)
    }
}

/// 评分任务的可观察快照
///
/// 视图层只读这个结构，不直接持有任务。
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub phase: JobPhase,
    pub submission_text: String,
    /// 提交内容来自哪个文件（手动输入时为空）
    pub submission_file: Option<String>,
    pub rubric: Vec<RubricItem>,
    pub result: Option<GradeResult>,
    /// 当前要显示的错误信息
    pub error: Option<String>,
    /// 评分中的进度文案，只在 Submitting 阶段有值
    pub status: Option<LoadingPhase>,
    pub save_meta: SaveMeta,
    /// 结果视图是否打开
    pub result_visible: bool,
}

impl JobSnapshot {
    pub fn new(rubric: Vec<RubricItem>) -> Self {
        Self {
            phase: JobPhase::Idle,
            submission_text: String::new(),
            submission_file: None,
            rubric,
            result: None,
            error: None,
            status: None,
            save_meta: SaveMeta::default(),
            result_visible: false,
        }
    }

    pub fn total_points(&self) -> u64 {
        total_points(&self.rubric)
    }

    /// 结果视图中的分数文本，例如 `8 / 10`
    pub fn score_label(&self) -> Option<String> {
        let result = self.result.as_ref()?;
        let total = self.total_points();
        Some(if total > 0 {
            format!("{} / {}", format_score(result.score), total)
        } else {
            format_score(result.score)
        })
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// "开始评分"按钮是否可用
    pub fn can_run(&self) -> bool {
        !self.is_busy() && !self.submission_text.trim().is_empty()
    }

    /// "保存"按钮是否可用
    pub fn can_save(&self) -> bool {
        self.phase == JobPhase::Succeeded && !self.save_meta.student_name.trim().is_empty()
    }
}

/// 保存操作的结果
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// 新写入的历史记录
    Saved(HistoryItem),
    /// 本次结果已经保存过，什么都没做
    AlreadySaved,
}

/// 评分任务参数
#[derive(Debug, Clone)]
pub struct JobSettings {
    /// 未填写学号时发送的学生标识
    pub student_identifier: String,
    pub status_interval: Duration,
    pub auto_close_delay: Duration,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl JobSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            student_identifier: config.default_student_id.clone(),
            status_interval: config.status_interval(),
            auto_close_delay: config.auto_close_delay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_rubric;

    #[test]
    fn score_label_uses_rubric_total() {
        let mut snapshot = JobSnapshot::new(default_rubric());
        assert_eq!(snapshot.score_label(), None);

        snapshot.result = Some(GradeResult {
            score: 8.0,
            feedback: "Good".to_string(),
            citations: Vec::new(),
            thinking_process: Vec::new(),
            confidence_score: None,
        });
        assert_eq!(snapshot.score_label().as_deref(), Some("8 / 10"));

        snapshot.rubric.clear();
        assert_eq!(snapshot.score_label().as_deref(), Some("8"));
    }

    #[test]
    fn run_requires_text_and_idle_job() {
        let mut snapshot = JobSnapshot::new(Vec::new());
        assert!(!snapshot.can_run());
        snapshot.submission_text = "essay".to_string();
        assert!(snapshot.can_run());
        snapshot.phase = JobPhase::Submitting;
        assert!(!snapshot.can_run());
    }
}
