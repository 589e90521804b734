use serde::{Deserialize, Serialize};

/// 评分标准中的一条评分项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricItem {
    /// 评分项名称
    pub criteria: String,
    /// 该项满分
    pub max_points: u32,
    /// 评分说明
    #[serde(default)]
    pub description: String,
}

impl RubricItem {
    pub fn new(
        criteria: impl Into<String>,
        max_points: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            criteria: criteria.into(),
            max_points,
            description: description.into(),
        }
    }

    /// 新增评分项时使用的空白项
    pub fn blank() -> Self {
        Self::new("", 10, "")
    }
}

/// 评分项的可编辑字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RubricField {
    Criteria(String),
    MaxPoints(u32),
    Description(String),
}

impl RubricItem {
    pub fn apply(&mut self, field: RubricField) {
        match field {
            RubricField::Criteria(v) => self.criteria = v,
            RubricField::MaxPoints(v) => self.max_points = v,
            RubricField::Description(v) => self.description = v,
        }
    }
}

/// 评分标准总分
///
/// 顺序只影响展示，不影响总分。按 u64 累加，单项分值再大也不会溢出。
pub fn total_points(rubric: &[RubricItem]) -> u64 {
    rubric.iter().map(|item| u64::from(item.max_points)).sum()
}

/// 评分页面初始的默认评分标准
pub fn default_rubric() -> Vec<RubricItem> {
    vec![RubricItem::new("Clarity", 10, "Is the argument clear?")]
}

/// "一键填充"使用的议论文评分模板（满分 100）
pub fn essay_template() -> Vec<RubricItem> {
    vec![
        RubricItem::new("Thesis Statement", 20, "Clear, arguable thesis present in intro."),
        RubricItem::new("Evidence", 30, "Claims supported by relevant text citations."),
        RubricItem::new("Analysis", 30, "Deep analysis of evidence, not just summary."),
        RubricItem::new("Grammar & Style", 20, "Professional tone, few errors."),
    ]
}
