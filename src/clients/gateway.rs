use crate::error::AppResult;
use crate::models::{
    ExtractedText, GradeRequest, GradeResult, IngestResponse, RubricItem, UploadFile,
};
use async_trait::async_trait;

/// 评分服务端口
///
/// 每个方法都是一次完整的请求/响应，没有进度通道，也不支持中途取消。
#[async_trait]
pub trait GradingGateway: Send + Sync {
    /// 对一份提交内容评分
    async fn grade(&self, request: &GradeRequest) -> AppResult<GradeResult>;

    /// 从单个文件中提取文本
    async fn extract_text(&self, file: &UploadFile) -> AppResult<ExtractedText>;

    /// 从一个或多个文件中解析评分标准
    async fn parse_rubric(&self, files: &[UploadFile]) -> AppResult<Vec<RubricItem>>;

    /// 导入课程材料（供检索增强使用）
    async fn ingest(&self, files: &[UploadFile]) -> AppResult<IngestResponse>;
}
