//! 资料库服务 - 业务能力层
//!
//! 负责导入的评分标准和课程材料记录的持久化，以及课程材料导入流程

use crate::clients::GradingGateway;
use crate::error::{AppError, AppResult, ValidationError};
use crate::infrastructure::{keys, JsonStoreExt, KeyValueStore};
use crate::models::{IngestResponse, RubricItem, UploadFile};
use std::sync::Arc;
use tracing::{error, info};

/// 资料库服务
pub struct LibraryService {
    store: Arc<dyn KeyValueStore>,
}

impl LibraryService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 读取上次导入的评分标准
    pub fn imported_rubric(&self) -> Option<Vec<RubricItem>> {
        self.store.load_json(keys::IMPORTED_RUBRIC)
    }

    pub fn save_imported_rubric(&self, rubric: &[RubricItem]) -> AppResult<()> {
        self.store.save_json(keys::IMPORTED_RUBRIC, rubric)
    }

    /// 已导入的课程材料文件名
    pub fn materials(&self) -> Vec<String> {
        self.store
            .load_json(keys::COURSE_MATERIALS)
            .unwrap_or_default()
    }

    /// 导入课程材料
    ///
    /// 成功后把文件名追加到材料记录（去重，保持顺序）；失败时记录保持不变。
    ///
    /// # 参数
    /// - `gateway`: 评分服务
    /// - `files`: 一个或多个文件
    ///
    /// # 返回
    /// 返回评分服务的导入结果
    pub async fn ingest_materials(
        &self,
        gateway: &dyn GradingGateway,
        files: &[UploadFile],
    ) -> AppResult<IngestResponse> {
        if files.is_empty() {
            return Err(ValidationError::NoFileSelected.into());
        }

        info!("📚 正在导入 {} 个课程材料...", files.len());

        let response = gateway.ingest(files).await.map_err(|e: AppError| {
            error!("❌ 课程材料导入失败: {}", e);
            e
        })?;

        let mut materials = self.materials();
        for file in files {
            if !materials.contains(&file.file_name) {
                materials.push(file.file_name.clone());
            }
        }
        self.store.save_json(keys::COURSE_MATERIALS, &materials)?;

        info!(
            "✓ 课程材料导入完成: 处理 {} 个文件，共记录 {} 个",
            response.files_processed,
            materials.len()
        );

        Ok(response)
    }

    pub fn clear_materials(&self) -> AppResult<()> {
        self.store.remove(keys::COURSE_MATERIALS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;

    #[test]
    fn imported_rubric_round_trip() {
        let library = LibraryService::new(Arc::new(MemoryStore::new()));
        assert_eq!(library.imported_rubric(), None);

        let rubric = vec![RubricItem::new("Evidence", 30, "")];
        library.save_imported_rubric(&rubric).unwrap();
        assert_eq!(library.imported_rubric(), Some(rubric));
    }

    #[test]
    fn clear_materials_forgets_recorded_files() {
        let store = Arc::new(MemoryStore::new());
        store
            .save_json(keys::COURSE_MATERIALS, &["week1.pdf", "week2.pdf"])
            .unwrap();
        let library = LibraryService::new(store.clone());
        assert_eq!(library.materials(), vec!["week1.pdf", "week2.pdf"]);

        library.clear_materials().unwrap();
        assert!(library.materials().is_empty());
        assert_eq!(store.read(keys::COURSE_MATERIALS).unwrap(), None);

        // 重复清空不会报错
        library.clear_materials().unwrap();
        assert!(library.materials().is_empty());
    }

    #[test]
    fn corrupted_materials_load_empty() {
        let store = Arc::new(MemoryStore::new());
        store.write(keys::COURSE_MATERIALS, "not-json").unwrap();
        let library = LibraryService::new(store);
        assert!(library.materials().is_empty());
    }
}
