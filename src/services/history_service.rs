//! 历史记录服务 - 业务能力层
//!
//! 只负责"读写评分历史"能力，不关心评分流程

use crate::error::AppResult;
use crate::infrastructure::{keys, JsonStoreExt, KeyValueStore};
use crate::models::HistoryItem;
use std::sync::Arc;
use tracing::{debug, info};

/// 仪表盘使用的汇总数据
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStats {
    pub total: usize,
    /// 有总分的记录的平均百分比
    pub average_percent: Option<f64>,
}

/// 历史记录服务
///
/// 职责：
/// - 整体读写历史序列（最新在前）
/// - 只追加到最前，不重排、不单条删除
/// - 每次写入前重新读取，避免覆盖其他写入者
pub struct HistoryService {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 读取全部历史；内容损坏时按空列表处理
    pub fn load(&self) -> Vec<HistoryItem> {
        self.store
            .load_json(keys::GRADING_HISTORY)
            .unwrap_or_default()
    }

    /// 把一条记录插入到最前面并写回
    pub fn prepend(&self, item: HistoryItem) -> AppResult<()> {
        let mut history = self.load();
        debug!("写入历史记录 {}，现有 {} 条", item.id, history.len());
        history.insert(0, item);
        self.store.save_json(keys::GRADING_HISTORY, &history)
    }

    /// 按姓名、学号或科目搜索（不区分大小写），空关键字返回全部
    pub fn search(&self, term: &str) -> Vec<HistoryItem> {
        self.load()
            .into_iter()
            .filter(|item| item.matches(term))
            .collect()
    }

    /// 最近的 `limit` 条记录
    pub fn recent(&self, limit: usize) -> Vec<HistoryItem> {
        let mut history = self.load();
        history.truncate(limit);
        history
    }

    pub fn find(&self, id: &str) -> Option<HistoryItem> {
        self.load().into_iter().find(|item| item.id == id)
    }

    pub fn stats(&self) -> HistoryStats {
        let history = self.load();
        let percents: Vec<f64> = history.iter().filter_map(HistoryItem::percent).collect();
        let average_percent =
            (!percents.is_empty()).then(|| percents.iter().sum::<f64>() / percents.len() as f64);

        HistoryStats {
            total: history.len(),
            average_percent,
        }
    }

    /// 清空全部历史（唯一的删除方式）
    pub fn clear(&self) -> AppResult<()> {
        info!("🗑️ 清空评分历史");
        self.store.remove(keys::GRADING_HISTORY)
    }
}
