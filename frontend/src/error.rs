//! 前端错误类型
//!
//! 按照响应语义划分错误类别：网络/传输失败、鉴权失败(401)、
//! 校验失败(4xx 带字段级细节)、服务端失败(5xx)、序列化失败。
//! 消息优先展示服务端下发的 `message`，否则回退到通用文案。

use std::fmt;

use propcrm_shared::ErrorBody;

// =========================================================
// 错误类别枚举
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 网络/传输层失败（请求未到达或未返回）
    Network,
    /// 401 鉴权失败
    Unauthorized,
    /// 404 资源未找到
    NotFound,
    /// 其余 4xx：业务校验失败
    Validation,
    /// 5xx 服务端失败
    Server,
    /// JSON 编解码失败
    Serialization,
}

impl ApiErrorKind {
    /// 该类错误的通用回退文案
    fn fallback_message(&self) -> &'static str {
        match self {
            ApiErrorKind::Network => "网络请求失败，请检查连接后重试",
            ApiErrorKind::Unauthorized => "登录状态已失效",
            ApiErrorKind::NotFound => "请求的资源不存在",
            ApiErrorKind::Validation => "提交的内容未通过校验",
            ApiErrorKind::Server => "服务端暂时不可用，请稍后重试",
            ApiErrorKind::Serialization => "响应数据格式异常",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// API 调用错误
///
/// - `kind`: 错误类别
/// - `status`: HTTP 状态码（传输层失败时为 None）
/// - `message`: 服务端下发的消息（若有）
/// - `detail`: 字段级校验细节（仅校验失败时出现），由发起表单内联展示
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    message: Option<String>,
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: Some(message.into()),
            detail: None,
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Serialization, message)
    }

    /// 从非 2xx 响应构造错误
    ///
    /// 尝试解析标准错误体；body 不是合法 JSON 时仅依状态码分类。
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let kind = match status {
            401 => ApiErrorKind::Unauthorized,
            404 => ApiErrorKind::NotFound,
            400..=499 => ApiErrorKind::Validation,
            _ => ApiErrorKind::Server,
        };
        Self {
            kind,
            status: Some(status),
            message: parsed.message,
            detail: parsed.detail,
        }
    }

    // --- Accessors ---

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    /// 面向用户的消息：服务端消息优先，缺省回退到类别文案
    pub fn user_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.kind.fallback_message().to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{:?} {}] {}", self.kind, status, self.user_message()),
            None => write!(f, "[{:?}] {}", self.kind, self.user_message()),
        }
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_codes() {
        assert_eq!(
            ApiError::from_response(401, "{}").kind,
            ApiErrorKind::Unauthorized
        );
        assert_eq!(
            ApiError::from_response(404, "{}").kind,
            ApiErrorKind::NotFound
        );
        assert_eq!(
            ApiError::from_response(422, "{}").kind,
            ApiErrorKind::Validation
        );
        assert_eq!(
            ApiError::from_response(500, "{}").kind,
            ApiErrorKind::Server
        );
    }

    #[test]
    fn server_message_takes_precedence() {
        let err = ApiError::from_response(422, r#"{"message":"标题不能为空","detail":"title"}"#);
        assert_eq!(err.user_message(), "标题不能为空");
        assert_eq!(err.detail.as_deref(), Some("title"));
    }

    #[test]
    fn falls_back_on_unparseable_body() {
        let err = ApiError::from_response(500, "<html>gateway</html>");
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.user_message(), "服务端暂时不可用，请稍后重试");
    }
}
