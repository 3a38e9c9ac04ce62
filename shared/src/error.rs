use std::fmt;

use serde::{Deserialize, Serialize};

// =========================================================
// 错误分类枚举
// =========================================================

/// 错误分类
///
/// 每个分类对应客户端管线中的一种失败来源。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiErrorKind {
    /// 401: 会话失效，客户端已清除会话
    Unauthorized,
    /// 后端以 `{ "success": false }` 拒绝了请求
    Rejected,
    /// 其他非 2xx 状态码
    Http,
    /// 网络层失败（连接失败、超时、被取消）
    Transport,
    /// 响应体无法解析为预期结构
    Decode,
    /// 请求体序列化失败
    Serialization,
    /// 持久化存储读写失败
    Storage,
    /// 调用方输入校验失败，请求未发出
    InvalidInput,
}

impl ApiErrorKind {
    /// 机器可读的错误代码
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::Unauthorized => "UNAUTHORIZED",
            ApiErrorKind::Rejected => "REQUEST_REJECTED",
            ApiErrorKind::Http => "HTTP_ERROR",
            ApiErrorKind::Transport => "TRANSPORT_ERROR",
            ApiErrorKind::Decode => "RESPONSE_DECODE_ERROR",
            ApiErrorKind::Serialization => "JSON_ENCODE_ERROR",
            ApiErrorKind::Storage => "STORAGE_ERROR",
            ApiErrorKind::InvalidInput => "INVALID_INPUT",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSpan {
    /// 操作名称，如 "client.send", "api.get_servers"
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端管线错误
///
/// - kind: 错误分类
/// - message: 错误消息（来自后端的 `message` 字段或本地描述）
/// - status: HTTP 状态码（仅在收到响应时存在）
/// - source: 原始错误（可选，用于错误链）
/// - spans: 结构化的调用追踪栈
#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub status: Option<u16>,
    source: Option<Box<dyn std::error::Error + 'static>>,
    spans: Vec<ErrorSpan>,
    /// 请求被主动取消（路由切换），不应重试
    aborted: bool,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
            spans: Vec::new(),
            aborted: false,
        }
    }

    // --- Convenience constructors ---

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unauthorized, message).with_status(401)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Rejected, message)
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Http, message).with_status(status)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, message)
    }

    /// 主动取消的请求，分类上仍属于传输错误
    pub fn aborted(message: impl Into<String>) -> Self {
        Self {
            aborted: true,
            ..Self::transport(message)
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Serialization, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Storage, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidInput, message)
    }

    // --- Context builders ---

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    /// 设置原始错误源
    pub fn with_source<E: std::error::Error + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    /// 是否值得对幂等读请求重试
    pub fn is_retryable(&self) -> bool {
        self.kind == ApiErrorKind::Transport && !self.aborted
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        let kind = if e.is_io() {
            ApiErrorKind::Serialization
        } else {
            ApiErrorKind::Decode
        };
        let message = e.to_string();
        ApiError::new(kind, message).with_source(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_trace() {
        let err = ApiError::http(500, "boom")
            .in_op("client.send")
            .in_op_with("api.get_servers", "/get_servers");

        assert_eq!(
            err.to_string(),
            "[HTTP_ERROR] boom | trace: client.send -> api.get_servers(/get_servers)"
        );
        assert_eq!(err.status, Some(500));
    }

    #[test]
    fn unauthorized_carries_401() {
        let err = ApiError::unauthorized("session expired");
        assert!(err.is_unauthorized());
        assert_eq!(err.status, Some(401));
        assert!(!err.is_retryable());
    }

    #[test]
    fn only_unaborted_transport_failures_retry() {
        assert!(ApiError::transport("connection reset").is_retryable());
        let aborted = ApiError::aborted("request aborted by navigation");
        assert_eq!(aborted.kind, ApiErrorKind::Transport);
        assert!(aborted.is_aborted());
        assert!(!aborted.is_retryable());
    }

    #[test]
    fn json_syntax_errors_become_decode_errors() {
        let err: ApiError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.kind, ApiErrorKind::Decode);
        assert!(std::error::Error::source(&err).is_some());
    }
}
