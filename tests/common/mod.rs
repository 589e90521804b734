#![allow(dead_code)]

use async_trait::async_trait;
use gradewise::clients::GradingGateway;
use gradewise::error::{AppError, AppResult, GatewayError, StorageError};
use gradewise::infrastructure::{KeyValueStore, MemoryStore};
use gradewise::models::{
    ExtractedText, GradeRequest, GradeResult, IngestResponse, RubricItem, UploadFile,
};
use gradewise::workflow::{GradingJob, JobSettings};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const STATUS_INTERVAL: Duration = Duration::from_millis(1800);
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_millis(1500);

/// 按脚本返回结果的评分服务
///
/// 失败时返回对应状态码的 BadStatus，错误详情为 "upstream unavailable"。
pub struct FakeGateway {
    grade_reply: Mutex<Result<GradeResult, u16>>,
    grade_delay: Option<Duration>,
    extract_reply: Result<String, u16>,
    rubric_reply: Result<Vec<RubricItem>, u16>,
    ingest_reply: Result<u32, u16>,
    grade_calls: AtomicUsize,
    extract_calls: AtomicUsize,
    parse_calls: AtomicUsize,
    ingest_calls: AtomicUsize,
    last_request: Mutex<Option<GradeRequest>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            grade_reply: Mutex::new(Ok(grade_result(8.0))),
            grade_delay: None,
            extract_reply: Ok("extracted essay text".to_string()),
            rubric_reply: Ok(vec![
                RubricItem::new("Evidence", 30, "Claims are supported"),
                RubricItem::new("Style", 20, "Clear prose"),
            ]),
            ingest_reply: Ok(0),
            grade_calls: AtomicUsize::new(0),
            extract_calls: AtomicUsize::new(0),
            parse_calls: AtomicUsize::new(0),
            ingest_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing_grade(self, status: u16) -> Self {
        self.set_grade_reply(Err(status));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.grade_delay = Some(delay);
        self
    }

    pub fn failing_extract(mut self, status: u16) -> Self {
        self.extract_reply = Err(status);
        self
    }

    pub fn with_rubric(mut self, rubric: Vec<RubricItem>) -> Self {
        self.rubric_reply = Ok(rubric);
        self
    }

    pub fn failing_rubric(mut self, status: u16) -> Self {
        self.rubric_reply = Err(status);
        self
    }

    pub fn failing_ingest(mut self, status: u16) -> Self {
        self.ingest_reply = Err(status);
        self
    }

    pub fn set_grade_reply(&self, reply: Result<GradeResult, u16>) {
        *self.grade_reply.lock() = reply;
    }

    pub fn grade_calls(&self) -> usize {
        self.grade_calls.load(Ordering::SeqCst)
    }

    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    pub fn parse_calls(&self) -> usize {
        self.parse_calls.load(Ordering::SeqCst)
    }

    pub fn ingest_calls(&self) -> usize {
        self.ingest_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GradeRequest> {
        self.last_request.lock().clone()
    }
}

fn bad_status(endpoint: &str, status: u16) -> AppError {
    GatewayError::BadStatus {
        endpoint: endpoint.to_string(),
        status,
        message: Some("upstream unavailable".to_string()),
    }
    .into()
}

#[async_trait]
impl GradingGateway for FakeGateway {
    async fn grade(&self, request: &GradeRequest) -> AppResult<GradeResult> {
        self.grade_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());
        if let Some(delay) = self.grade_delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.grade_reply.lock().clone();
        reply.map_err(|status| bad_status("/grade", status))
    }

    async fn extract_text(&self, _file: &UploadFile) -> AppResult<ExtractedText> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        match &self.extract_reply {
            Ok(text) => Ok(ExtractedText { text: text.clone() }),
            Err(status) => Err(bad_status("/extract-text", *status)),
        }
    }

    async fn parse_rubric(&self, _files: &[UploadFile]) -> AppResult<Vec<RubricItem>> {
        self.parse_calls.fetch_add(1, Ordering::SeqCst);
        self.rubric_reply
            .clone()
            .map_err(|status| bad_status("/parse-rubric", status))
    }

    async fn ingest(&self, files: &[UploadFile]) -> AppResult<IngestResponse> {
        self.ingest_calls.fetch_add(1, Ordering::SeqCst);
        match self.ingest_reply {
            Ok(_) => Ok(IngestResponse {
                status: "success".to_string(),
                files_processed: files.len() as u32,
                extra: Default::default(),
            }),
            Err(status) => Err(bad_status("/ingest", status)),
        }
    }
}

pub fn grade_result(score: f64) -> GradeResult {
    GradeResult {
        score,
        feedback: "Good argument, but expand the conclusion.".to_string(),
        citations: vec!["Paragraph 2 states the thesis.".to_string()],
        thinking_process: Vec::new(),
        confidence_score: Some(0.9),
    }
}

pub fn job_settings() -> JobSettings {
    JobSettings {
        student_identifier: "student-123".to_string(),
        status_interval: STATUS_INTERVAL,
        auto_close_delay: AUTO_CLOSE_DELAY,
    }
}

pub fn new_job(gateway: &Arc<FakeGateway>, store: &Arc<MemoryStore>) -> GradingJob {
    GradingJob::new(gateway.clone(), store.clone(), job_settings())
}

/// 可读但拒绝一切写入的存储
pub struct ReadOnlyStore {
    inner: MemoryStore,
}

impl ReadOnlyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
        }
    }
}

impl KeyValueStore for ReadOnlyStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, _value: &str) -> AppResult<()> {
        Err(StorageError::WriteFailed {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        }
        .into())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key)
    }
}
