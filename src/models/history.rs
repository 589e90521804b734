//! 历史评分记录

use crate::models::grade::format_score;
use serde::{Deserialize, Serialize};

/// 一条已保存的评分记录
///
/// 只在用户确认"保存到历史"时创建，创建后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    /// 保存时间（ISO 8601）
    pub date: String,
    pub student_name: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub subject: String,
    pub score: f64,
    /// 保存时评分标准的总分
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<u64>,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

/// 保存前由教师填写的元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveMeta {
    pub student_name: String,
    pub student_id: String,
    pub subject: String,
}

impl Default for SaveMeta {
    fn default() -> Self {
        Self {
            student_name: String::new(),
            student_id: String::new(),
            subject: "English 101".to_string(),
        }
    }
}

/// 分数档位，用于列表和详情中的徽章颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl ScoreBand {
    pub fn from_value(value: f64) -> Self {
        if value >= 90.0 {
            ScoreBand::Excellent
        } else if value >= 80.0 {
            ScoreBand::Good
        } else if value >= 70.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::NeedsWork
        }
    }
}

impl HistoryItem {
    /// 百分比得分，总分未知或为 0 时返回 None
    pub fn percent(&self) -> Option<f64> {
        match self.max_score {
            Some(max) if max > 0 => Some(self.score / max as f64 * 100.0),
            _ => None,
        }
    }

    /// 有总分时按百分比分档，否则按原始分数分档
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_value(self.percent().unwrap_or(self.score))
    }

    /// 头像上显示的姓名缩写，最多两个字符
    pub fn initials(&self) -> String {
        self.student_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// 展示用分数文本，例如 `8 / 10`
    pub fn score_label(&self) -> String {
        match self.max_score {
            Some(max) if max > 0 => format!("{} / {}", format_score(self.score), max),
            _ => format_score(self.score),
        }
    }

    /// 姓名、学号、科目中任意一项包含关键字（不区分大小写）
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [&self.student_name, &self.student_id, &self.subject]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}
