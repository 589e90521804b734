use crate::error::ValidationError;
use crate::models::grade::format_score;
use crate::models::rubric::RubricItem;
use serde::{Deserialize, Serialize};

/// 教师个人资料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            first_name: "Wilson".to_string(),
            last_name: "Admin".to_string(),
            email: "wilson@gradewise.ai".to_string(),
        }
    }
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// 评分助手的风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persona {
    Standard,
    Strict,
    Encouraging,
}

/// 成绩展示方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeScale {
    #[serde(rename = "Percentage (0-100)")]
    Percentage,
    #[serde(rename = "Points (x/Total)")]
    Points,
    #[serde(rename = "Letter Grade (A-F)")]
    Letter,
}

impl GradeScale {
    /// 按当前展示方式格式化分数
    ///
    /// 总分为 0 时无法换算，百分制和等级制都直接显示原始分数。
    pub fn format(&self, score: f64, max_points: u64) -> String {
        let percent = (max_points > 0).then(|| score / max_points as f64 * 100.0);
        match (self, percent) {
            (GradeScale::Points, _) if max_points > 0 => {
                format!("{} / {}", format_score(score), max_points)
            }
            (GradeScale::Percentage, Some(p)) => format!("{}%", format_score(p.round())),
            (GradeScale::Letter, Some(p)) => letter_grade(p).to_string(),
            _ => format_score(score),
        }
    }
}

fn letter_grade(percent: f64) -> &'static str {
    match percent {
        p if p >= 90.0 => "A",
        p if p >= 80.0 => "B",
        p if p >= 70.0 => "C",
        p if p >= 60.0 => "D",
        _ => "F",
    }
}

/// 教学相关设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationSettings {
    pub persona: Persona,
    /// 是否要求评分前至少有一条评分标准
    pub require_rubric: bool,
    pub grade_scale: GradeScale,
}

impl Default for EducationSettings {
    fn default() -> Self {
        Self {
            persona: Persona::Standard,
            require_rubric: true,
            grade_scale: GradeScale::Percentage,
        }
    }
}

impl EducationSettings {
    /// 按 requireRubric 检查评分标准
    pub fn check_rubric(&self, rubric: &[RubricItem]) -> Result<(), ValidationError> {
        if self.require_rubric && rubric.is_empty() {
            return Err(ValidationError::RubricRequired);
        }
        Ok(())
    }
}
