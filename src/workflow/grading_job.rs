//! 评分任务流程 - 流程层
//!
//! 核心职责：驱动"一次评分"从输入到保存历史的完整生命周期
//!
//! 流程顺序：
//! 1. 校验提交内容 → 失败直接进入 Failed，不发请求
//! 2. 发送评分请求，期间轮播进度文案
//! 3. 成功 → Succeeded / 失败 → Failed（输入保持不变，可重新评分）
//! 4. 用户确认保存 → Saving → Saved（同一结果只写入一次）

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::clients::GradingGateway;
use crate::error::{AppError, AppResult, ValidationError};
use crate::infrastructure::KeyValueStore;
use crate::models::{
    default_rubric, essay_template, format_score, total_points, GradeRequest, GradeResult,
    HistoryItem, RubricField, RubricItem, SaveMeta, UploadFile,
};
use crate::services::{HistoryService, LibraryService, StatusCycler};
use crate::workflow::job_state::{JobPhase, JobSettings, JobSnapshot, SaveOutcome};

/// 评分任务
///
/// - 一个实例同一时间最多只有一个进行中的请求（`&mut self` 保证）
/// - 状态通过 watch 通道对外发布
/// - 唯一的持久化副作用是保存历史记录
pub struct GradingJob {
    gateway: Arc<dyn GradingGateway>,
    history: HistoryService,
    library: LibraryService,
    settings: JobSettings,
    state: Arc<watch::Sender<JobSnapshot>>,
    auto_close: Option<JoinHandle<()>>,
}

impl GradingJob {
    /// 创建评分任务
    ///
    /// 若本地存有导入的评分标准则使用它，否则使用默认评分标准。
    pub fn new(
        gateway: Arc<dyn GradingGateway>,
        store: Arc<dyn KeyValueStore>,
        settings: JobSettings,
    ) -> Self {
        let library = LibraryService::new(store.clone());
        let rubric = match library.imported_rubric() {
            Some(rubric) if !rubric.is_empty() => {
                info!("📋 使用已导入的评分标准 ({} 项)", rubric.len());
                rubric
            }
            _ => default_rubric(),
        };

        let (state, _) = watch::channel(JobSnapshot::new(rubric));

        Self {
            gateway,
            history: HistoryService::new(store),
            library,
            settings,
            state: Arc::new(state),
            auto_close: None,
        }
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.state.subscribe()
    }

    /// 当前状态的副本
    pub fn snapshot(&self) -> JobSnapshot {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> JobPhase {
        self.state.borrow().phase
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    pub fn library(&self) -> &LibraryService {
        &self.library
    }

    fn update(&self, f: impl FnOnce(&mut JobSnapshot)) {
        self.state.send_modify(f);
    }

    // ========== 输入编辑 ==========

    pub fn set_submission_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.update(|s| s.submission_text = text);
    }

    pub fn set_rubric(&mut self, rubric: Vec<RubricItem>) {
        self.update(|s| s.rubric = rubric);
    }

    pub fn add_rubric_item(&mut self) {
        self.update(|s| s.rubric.push(RubricItem::blank()));
    }

    pub fn update_rubric_item(&mut self, index: usize, field: RubricField) -> AppResult<()> {
        let len = self.state.borrow().rubric.len();
        if index >= len {
            return Err(ValidationError::RubricIndexOutOfRange { index, len }.into());
        }
        self.update(|s| s.rubric[index].apply(field));
        Ok(())
    }

    pub fn remove_rubric_item(&mut self, index: usize) -> AppResult<RubricItem> {
        let len = self.state.borrow().rubric.len();
        if index >= len {
            return Err(ValidationError::RubricIndexOutOfRange { index, len }.into());
        }
        let mut removed = None;
        self.update(|s| removed = Some(s.rubric.remove(index)));
        removed.ok_or_else(|| ValidationError::RubricIndexOutOfRange { index, len }.into())
    }

    /// 用议论文模板替换当前评分标准
    pub fn apply_rubric_template(&mut self) {
        self.set_rubric(essay_template());
    }

    pub fn set_save_meta(&mut self, meta: SaveMeta) {
        self.update(|s| s.save_meta = meta);
    }

    // ========== 评分 ==========

    /// 执行一次评分
    ///
    /// 提交内容为空时直接失败且不会发出请求；评分标准为空不做校验。
    /// 失败后提交内容和评分标准保持原样，可以直接重新评分。
    ///
    /// # 返回
    /// 返回评分结果
    pub async fn run_grading(&mut self) -> AppResult<GradeResult> {
        self.cancel_auto_close();
        self.update(|s| {
            s.phase = JobPhase::Validating;
            s.result = None;
            s.error = None;
            s.status = None;
            s.result_visible = false;
        });

        let snapshot = self.snapshot();
        if snapshot.submission_text.trim().is_empty() {
            let err = AppError::from(ValidationError::SubmissionTextRequired);
            warn!("⚠️ {}", err);
            self.fail(&err);
            return Err(err);
        }

        let request = GradeRequest {
            student_id: self.student_identifier(&snapshot.save_meta),
            submission_text: snapshot.submission_text,
            rubric: snapshot.rubric,
        };

        info!(
            "🤖 开始评分: 学生 {} | 评分项 {} 条 | 满分 {}",
            request.student_id,
            request.rubric.len(),
            total_points(&request.rubric)
        );

        self.update(|s| s.phase = JobPhase::Submitting);

        let state = self.state.clone();
        let cycler = StatusCycler::start(self.settings.status_interval, move |phase| {
            // 已离开 Submitting 时忽略（多线程运行时下回调可能与结束同时发生）
            state.send_if_modified(|s| {
                if s.phase == JobPhase::Submitting {
                    s.status = Some(phase);
                    true
                } else {
                    false
                }
            });
        });

        let outcome = self.gateway.grade(&request).await;
        drop(cycler);

        match outcome {
            Ok(result) => {
                info!(
                    "✓ 评分完成: {} 分 (满分 {})",
                    format_score(result.score),
                    total_points(&request.rubric)
                );
                let published = result.clone();
                self.update(|s| {
                    s.phase = JobPhase::Succeeded;
                    s.status = None;
                    s.result = Some(published);
                    s.result_visible = true;
                });
                Ok(result)
            }
            Err(err) => {
                error!("❌ 评分失败: {}", err);
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn fail(&self, err: &AppError) {
        let message = err.user_message();
        self.update(|s| {
            s.phase = JobPhase::Failed;
            s.status = None;
            s.error = Some(message);
        });
    }

    fn student_identifier(&self, meta: &SaveMeta) -> String {
        let id = meta.student_id.trim();
        if id.is_empty() {
            self.settings.student_identifier.clone()
        } else {
            id.to_string()
        }
    }

    // ========== 保存 ==========

    /// 把当前评分结果保存到历史
    ///
    /// 同一结果重复保存时不做任何事；学生姓名为空时保持 Succeeded 并提示。
    pub fn save(&mut self) -> AppResult<SaveOutcome> {
        let snapshot = self.snapshot();
        match snapshot.phase {
            JobPhase::Saved => {
                debug!("结果已保存，忽略重复保存");
                return Ok(SaveOutcome::AlreadySaved);
            }
            JobPhase::Succeeded => {}
            _ => return Err(ValidationError::NoGradeResult.into()),
        }

        let result = snapshot
            .result
            .ok_or(AppError::Validation(ValidationError::NoGradeResult))?;

        let meta = snapshot.save_meta;
        if meta.student_name.trim().is_empty() {
            let err = AppError::from(ValidationError::StudentNameRequired);
            let message = err.user_message();
            self.update(|s| s.error = Some(message));
            return Err(err);
        }

        self.update(|s| {
            s.phase = JobPhase::Saving;
            s.error = None;
        });

        let item = HistoryItem {
            id: Uuid::new_v4().to_string(),
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            student_name: meta.student_name.trim().to_string(),
            student_id: meta.student_id.trim().to_string(),
            subject: meta.subject.trim().to_string(),
            score: result.score,
            max_score: Some(total_points(&snapshot.rubric)),
            feedback: result.feedback,
            citations: result.citations,
        };

        if let Err(err) = self.history.prepend(item.clone()) {
            error!("❌ 保存历史记录失败: {}", err);
            let message = err.user_message();
            self.update(|s| {
                s.phase = JobPhase::Succeeded;
                s.error = Some(message);
            });
            return Err(err);
        }

        self.update(|s| s.phase = JobPhase::Saved);
        info!(
            "💾 已保存到历史: {} | {} | {}",
            item.student_name,
            item.subject,
            item.score_label()
        );

        self.schedule_auto_close();
        Ok(SaveOutcome::Saved(item))
    }

    /// 保存成功后延迟关闭结果视图
    fn schedule_auto_close(&mut self) {
        self.cancel_auto_close();
        let state = self.state.clone();
        let delay = self.settings.auto_close_delay;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                self.auto_close = Some(handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    state.send_if_modified(|s| {
                        if s.phase == JobPhase::Saved && s.result_visible {
                            s.result_visible = false;
                            true
                        } else {
                            false
                        }
                    });
                }));
            }
            Err(_) => self.update(|s| s.result_visible = false),
        }
    }

    fn cancel_auto_close(&mut self) {
        if let Some(handle) = self.auto_close.take() {
            handle.abort();
        }
    }

    /// 关闭结果视图（"取消"）
    ///
    /// 未保存的结果会被丢弃；已保存的结果保持 Saved，重复保存仍然无效。
    pub fn dismiss_result(&mut self) {
        self.cancel_auto_close();
        self.update(|s| {
            if s.phase == JobPhase::Succeeded {
                s.phase = JobPhase::Idle;
                s.result = None;
            }
            s.result_visible = false;
        });
    }

    /// 回到 Idle，保留提交内容、评分标准和保存信息
    pub fn reset(&mut self) {
        self.cancel_auto_close();
        self.update(|s| {
            s.phase = JobPhase::Idle;
            s.result = None;
            s.error = None;
            s.status = None;
            s.result_visible = false;
        });
    }

    // ========== 文件导入 ==========

    /// 从文件读取提交内容
    ///
    /// 纯文本文件在本地读取，其他格式交给评分服务提取文本。
    /// 失败时提示错误，原有提交内容保持不变。
    pub async fn load_submission_file(&mut self, file: UploadFile) -> AppResult<()> {
        info!("📄 读取提交文件: {}", file.file_name);

        let text = if file.is_plain_text() {
            file.text_lossy()
        } else {
            match self.gateway.extract_text(&file).await {
                Ok(extracted) => extracted.text,
                Err(err) => {
                    error!("❌ 文本提取失败 ({}): {}", file.file_name, err);
                    self.show_error(&err);
                    return Err(err);
                }
            }
        };

        debug!("提交内容长度: {} 字符", text.chars().count());

        let file_name = file.file_name;
        self.update(|s| {
            s.submission_text = text;
            s.submission_file = Some(file_name);
            s.error = None;
        });
        Ok(())
    }

    /// 从文件导入评分标准
    ///
    /// 解析并持久化成功后才替换当前评分标准，下次创建任务时自动使用；
    /// 解析或保存失败时评分标准保持不变。
    pub async fn import_rubric(&mut self, files: &[UploadFile]) -> AppResult<Vec<RubricItem>> {
        if files.is_empty() {
            let err = AppError::from(ValidationError::NoFileSelected);
            self.show_error(&err);
            return Err(err);
        }

        info!("📋 正在解析评分标准 ({} 个文件)...", files.len());

        let rubric = match self.gateway.parse_rubric(files).await {
            Ok(rubric) => rubric,
            Err(err) => {
                error!("❌ 评分标准解析失败: {}", err);
                self.show_error(&err);
                return Err(err);
            }
        };

        info!(
            "✓ 解析出 {} 条评分项，满分 {}",
            rubric.len(),
            total_points(&rubric)
        );

        // 先持久化，写入失败时当前评分标准保持不变
        if let Err(err) = self.library.save_imported_rubric(&rubric) {
            error!("❌ 评分标准未能保存到本地: {}", err);
            self.show_error(&err);
            return Err(err);
        }

        let imported = rubric.clone();
        self.update(|s| {
            s.rubric = imported;
            s.error = None;
        });

        Ok(rubric)
    }

    fn show_error(&self, err: &AppError) {
        let message = err.user_message();
        self.update(|s| s.error = Some(message));
    }
}

impl Drop for GradingJob {
    fn drop(&mut self) {
        self.cancel_auto_close();
    }
}
