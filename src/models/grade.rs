use crate::models::rubric::RubricItem;
use serde::{Deserialize, Serialize};

/// 一次评分的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    /// 得分（按评分标准总分或百分制，取决于评分服务）
    pub score: f64,
    pub feedback: String,
    /// 引用的课程材料片段
    #[serde(default)]
    pub citations: Vec<String>,
    /// 评分智能体的推理步骤
    #[serde(default)]
    pub thinking_process: Vec<String>,
    /// 置信度 [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

/// `/grade` 请求体
#[derive(Debug, Clone, Serialize)]
pub struct GradeRequest {
    pub submission_text: String,
    pub student_id: String,
    pub rubric: Vec<RubricItem>,
}

/// `/extract-text` 响应
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractedText {
    pub text: String,
}

/// `/ingest` 响应
#[derive(Debug, Clone, Deserialize)]
pub struct IngestResponse {
    #[serde(default)]
    pub status: String,
    pub files_processed: u32,
    /// 服务返回的其他字段原样保留
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// 把分数格式化为展示文本，整数分不带小数
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{:.1}", score)
    }
}
