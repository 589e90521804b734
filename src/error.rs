use thiserror::Error;

/// 应用程序错误类型
///
/// 所有失败都只影响当前这一次操作（评分、保存、导入），不会导致进程退出。
#[derive(Debug, Error)]
pub enum AppError {
    /// 本地输入校验失败，不会发送到评分服务
    #[error("校验失败: {0}")]
    Validation(#[from] ValidationError),
    /// 评分服务调用失败
    #[error("评分服务错误: {0}")]
    Gateway(#[from] GatewayError),
    /// 本地存储读写失败
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 本地输入校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 提交内容为空
    #[error("请先输入学生提交内容")]
    SubmissionTextRequired,
    /// 保存时学生姓名为空
    #[error("学生姓名不能为空")]
    StudentNameRequired,
    /// 还没有评分结果
    #[error("尚无评分结果，无法保存")]
    NoGradeResult,
    /// 未选择任何文件
    #[error("未选择文件")]
    NoFileSelected,
    /// 评分标准索引越界
    #[error("评分标准索引 {index} 超出范围 (共 {len} 项)")]
    RubricIndexOutOfRange { index: usize, len: usize },
    /// 设置要求评分标准，但当前评分标准为空
    #[error("当前设置要求至少一条评分标准")]
    RubricRequired,
}

/// 评分服务错误
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 网络请求失败（连接失败、超时等）
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务返回非成功状态码
    #[error("服务返回错误状态 ({endpoint}): {status}, message={message:?}")]
    BadStatus {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 响应无法解析
    #[error("响应解析失败 ({endpoint}): {source}")]
    InvalidResponse {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 本地存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("读取失败 ({key}): {source}")]
    ReadFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("写入失败 ({key}): {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("序列化失败 ({key}): {source}")]
    SerializeFailed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建网络请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Gateway(GatewayError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建响应解析失败错误
    pub fn invalid_response(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Gateway(GatewayError::InvalidResponse {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 是否为本地校验错误
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// 展示给用户的错误文本
    ///
    /// 评分服务返回了错误详情时直接使用该详情，否则使用通用提示。
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Gateway(GatewayError::BadStatus {
                message: Some(message),
                ..
            }) if !message.trim().is_empty() => message.clone(),
            AppError::Gateway(GatewayError::BadStatus { status, .. }) => {
                format!("评分服务请求失败 (状态码 {})", status)
            }
            AppError::Gateway(GatewayError::RequestFailed { .. }) => {
                "无法连接评分服务，请稍后重试".to_string()
            }
            AppError::Gateway(GatewayError::InvalidResponse { .. }) => {
                "评分服务返回了无法识别的结果".to_string()
            }
            AppError::Storage(e) => format!("保存失败: {}", e),
            AppError::Config(e) => e.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_gateway_detail() {
        let err = AppError::Gateway(GatewayError::BadStatus {
            endpoint: "/grade".to_string(),
            status: 500,
            message: Some("rubric is malformed".to_string()),
        });
        assert_eq!(err.user_message(), "rubric is malformed");
    }

    #[test]
    fn user_message_falls_back_without_detail() {
        let err = AppError::Gateway(GatewayError::BadStatus {
            endpoint: "/grade".to_string(),
            status: 502,
            message: Some("   ".to_string()),
        });
        assert!(err.user_message().contains("502"));
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = AppError::from(ValidationError::SubmissionTextRequired);
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "请先输入学生提交内容");
    }
}
