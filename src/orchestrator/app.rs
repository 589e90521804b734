//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：创建本地存储和评分服务客户端
//! 2. **命令分发**：grade / history / import-rubric / ingest
//! 3. **教学设置**：评分前检查 requireRubric，输出时按评分制式显示
//!
//! 不做评分流程本身的判断，评分由 `workflow::GradingJob` 完成。

use crate::clients::{GatewayClient, GradingGateway};
use crate::config::Config;
use crate::infrastructure::{FileStore, KeyValueStore};
use crate::models::{load_upload_file, load_upload_files, HistoryItem, RubricItem, SaveMeta};
use crate::orchestrator::command::Command;
use crate::services::{HistoryService, LibraryService, SettingsService};
use crate::utils::logging::{log_history_stats, log_startup};
use crate::utils::truncate_text;
use crate::workflow::{GradingJob, JobSettings, SaveOutcome};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// 历史命令最多显示的条数
const RECENT_LIMIT: usize = 5;

/// 应用主结构
pub struct App {
    config: Config,
    store: Arc<dyn KeyValueStore>,
    gateway: Arc<dyn GradingGateway>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let store = FileStore::open(&config.data_dir)
            .with_context(|| format!("无法打开本地数据目录: {}", config.data_dir))?;
        let gateway = GatewayClient::new(&config)?;

        Ok(Self::with_parts(config, Arc::new(store), Arc::new(gateway)))
    }

    /// 使用现成的存储和评分服务组装应用
    pub fn with_parts(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn GradingGateway>,
    ) -> Self {
        Self {
            config,
            store,
            gateway,
        }
    }

    /// 执行一条命令
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Grade { file, meta } => {
                self.grade(&file, meta).await?;
            }
            Command::History { term } => self.show_history(&term),
            Command::ImportRubric { files } => {
                self.import_rubric(&files).await?;
            }
            Command::Ingest { files } => self.ingest(&files).await?,
        }
        Ok(())
    }

    fn new_job(&self) -> GradingJob {
        GradingJob::new(
            self.gateway.clone(),
            self.store.clone(),
            JobSettings::from_config(&self.config),
        )
    }

    /// 对一份提交评分并保存到历史
    ///
    /// # 参数
    /// - `file`: 提交文件
    /// - `meta`: 学生姓名、学号和科目
    ///
    /// # 返回
    /// 返回新写入的历史记录（本次结果已保存过时为 None）
    pub async fn grade(&self, file: &Path, meta: SaveMeta) -> Result<Option<HistoryItem>> {
        let education = SettingsService::new(self.store.clone()).education();
        let mut job = self.new_job();

        education.check_rubric(&job.snapshot().rubric)?;

        let upload = load_upload_file(file).await?;
        job.load_submission_file(upload).await?;
        job.set_save_meta(meta);

        let result = job.run_grading().await?;
        let snapshot = job.snapshot();

        println!("{}", "=".repeat(60));
        println!(
            "得分: {}",
            education
                .grade_scale
                .format(result.score, snapshot.total_points())
        );
        if let Some(confidence) = result.confidence_score {
            println!("置信度: {:.0}%", confidence * 100.0);
        }
        println!("{}", "─".repeat(60));
        println!("{}", result.feedback);
        if !result.citations.is_empty() {
            println!("{}", "─".repeat(60));
            for citation in &result.citations {
                println!("  • {}", citation);
            }
        }
        println!("{}", "=".repeat(60));

        match job.save()? {
            SaveOutcome::Saved(item) => Ok(Some(item)),
            SaveOutcome::AlreadySaved => Ok(None),
        }
    }

    /// 显示历史：带关键字时搜索，否则显示最近记录和统计
    pub fn show_history(&self, term: &str) {
        let history = HistoryService::new(self.store.clone());
        let items = if term.trim().is_empty() {
            log_history_stats(&history.stats());
            history.recent(RECENT_LIMIT)
        } else {
            history.search(term)
        };

        if items.is_empty() {
            warn!("⚠️ 没有找到评分记录");
            return;
        }

        for item in &items {
            println!(
                "[{}] {} {} ({}) | {} | {} | {}",
                item.initials(),
                item.student_name,
                item.student_id,
                item.subject,
                item.score_label(),
                item.date,
                truncate_text(&item.feedback, 40)
            );
        }
    }

    /// 从文件导入评分标准，下次评分时自动使用
    pub async fn import_rubric(&self, paths: &[PathBuf]) -> Result<Vec<RubricItem>> {
        let files = load_upload_files(paths).await?;
        let mut job = self.new_job();
        let rubric = job.import_rubric(&files).await?;

        for item in &rubric {
            println!("  • {} ({} 分) {}", item.criteria, item.max_points, item.description);
        }
        Ok(rubric)
    }

    /// 导入课程材料
    pub async fn ingest(&self, paths: &[PathBuf]) -> Result<()> {
        let files = load_upload_files(paths).await?;
        let library = LibraryService::new(self.store.clone());
        let response = library
            .ingest_materials(self.gateway.as_ref(), &files)
            .await?;

        info!(
            "✓ 评分服务已处理 {} 个文件 (状态: {})",
            response.files_processed, response.status
        );
        for name in library.materials() {
            println!("  • {}", name);
        }
        Ok(())
    }
}
