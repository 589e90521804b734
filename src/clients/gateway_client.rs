//! 评分服务 HTTP 客户端
//!
//! 封装所有与评分服务相关的调用逻辑

use crate::clients::gateway::GradingGateway;
use crate::config::Config;
use crate::error::{AppError, AppResult, GatewayError};
use crate::models::{
    ExtractedText, GradeRequest, GradeResult, IngestResponse, RubricItem, UploadFile,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

const GRADE_ENDPOINT: &str = "grade";
const EXTRACT_TEXT_ENDPOINT: &str = "extract-text";
const PARSE_RUBRIC_ENDPOINT: &str = "parse-rubric";
const INGEST_ENDPOINT: &str = "ingest";

/// 评分服务客户端
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// 创建新的评分服务客户端
    ///
    /// 配置了超时则对所有请求生效，否则一直等待服务返回。
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::request_failed("client", e))?;

        Ok(Self {
            http,
            base_url: config.gateway_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// 发送 JSON 请求
    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> AppResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("评分服务请求失败 (/{}): {}", endpoint, e);
                AppError::request_failed(endpoint, e)
            })?;

        decode_response(endpoint, response).await
    }

    /// 发送 multipart 请求
    ///
    /// # 参数
    /// - `endpoint`: 接口路径
    /// - `field`: 表单字段名（单文件用 `file`，多文件重复使用 `files`）
    /// - `files`: 待上传文件
    async fn post_files<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        field: &'static str,
        files: &[UploadFile],
    ) -> AppResult<T> {
        let mut form = Form::new();
        for file in files {
            form = form.part(field, file_part(endpoint, file)?);
        }

        debug!("上传 {} 个文件到 /{}", files.len(), endpoint);

        let response = self
            .http
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("评分服务上传失败 (/{}): {}", endpoint, e);
                AppError::request_failed(endpoint, e)
            })?;

        decode_response(endpoint, response).await
    }
}

#[async_trait]
impl GradingGateway for GatewayClient {
    async fn grade(&self, request: &GradeRequest) -> AppResult<GradeResult> {
        debug!(
            "评分请求: 学生 {} | 提交长度 {} 字符 | 评分项 {} 条",
            request.student_id,
            request.submission_text.chars().count(),
            request.rubric.len()
        );
        self.post_json(GRADE_ENDPOINT, request).await
    }

    async fn extract_text(&self, file: &UploadFile) -> AppResult<ExtractedText> {
        self.post_files(EXTRACT_TEXT_ENDPOINT, "file", std::slice::from_ref(file))
            .await
    }

    async fn parse_rubric(&self, files: &[UploadFile]) -> AppResult<Vec<RubricItem>> {
        self.post_files(PARSE_RUBRIC_ENDPOINT, "files", files).await
    }

    async fn ingest(&self, files: &[UploadFile]) -> AppResult<IngestResponse> {
        self.post_files(INGEST_ENDPOINT, "files", files).await
    }
}

fn file_part(endpoint: &str, file: &UploadFile) -> AppResult<Part> {
    let part = Part::bytes(file.content.clone()).file_name(file.file_name.clone());
    match &file.mime_type {
        Some(mime) => part
            .mime_str(mime)
            .map_err(|e| AppError::request_failed(endpoint, e)),
        None => Ok(part),
    }
}

/// 检查状态码并解析响应体
async fn decode_response<T: DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Response,
) -> AppResult<T> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::request_failed(endpoint, e))?;

    if !status.is_success() {
        let message = error_detail(&body);
        warn!(
            "评分服务返回错误 (/{}): {} {:?}",
            endpoint,
            status.as_u16(),
            message
        );
        return Err(GatewayError::BadStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        }
        .into());
    }

    serde_json::from_slice(&body).map_err(|e| AppError::invalid_response(endpoint, e))
}

/// 从错误响应体中提取可读的错误信息
///
/// 优先取 JSON 中的 `detail` 字段（字符串原样返回，其他结构序列化为文本），
/// 其次是 `message` / `error` 字段，最后是原始文本。
pub(crate) fn error_detail(body: &[u8]) -> Option<String> {
    if let Ok(json) = serde_json::from_slice::<Value>(body) {
        for key in ["detail", "message", "error"] {
            match json.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
                Some(Value::Null) | None => continue,
                Some(Value::String(_)) => continue,
                Some(other) => return Some(other.to_string()),
            }
        }
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    (!text.is_empty()).then_some(text)
}
