//! HTTP 客户端适配层
//!
//! 应用内唯一允许发起网络请求的组件。职责：
//! - 依据 `ApiRequest` 协议元数据拼接 URL / 查询串 / 请求体
//! - 为每个请求注入 `Authorization: Bearer` 头（若令牌存在）
//! - 全局 401 处理：非认证入口页面收到 401 时清除令牌并重定向到登录页；
//!   认证入口自身的 401 原样返回，交由登录表单展示，避免重定向循环
//!
//! 具体传输通过 `HttpTransport` 特性注入，生产环境为 `gloo-net`，
//! 测试中替换为内存 mock。

use std::rc::Rc;

use propcrm_shared::protocol::{ApiRequest, HttpMethod};
use send_wrapper::SendWrapper;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};
use crate::web::console_log;
use crate::web::route::AppRoute;

#[cfg(test)]
mod tests;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// 通用 HTTP 响应结构
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// 显式取消句柄
///
/// 封装 `AbortController`，供长耗时请求（如 AI 助手对话）由用户主动中止。
pub struct CancelHandle {
    controller: web_sys::AbortController,
}

impl CancelHandle {
    /// # Panics
    /// 如果浏览器环境无法创建 AbortController
    pub fn new() -> Self {
        let controller = web_sys::AbortController::new().expect("无法创建 AbortController");
        Self { controller }
    }

    pub fn signal(&self) -> web_sys::AbortSignal {
        self.controller.signal()
    }

    /// 中止关联的在途请求
    pub fn cancel(&self) {
        self.controller.abort();
    }
}

/// HTTP 传输特性 (Trait)
///
/// 使用 async_trait 以支持异步调用，(?Send) 是因为 WASM 环境下相关类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    async fn send(
        &self,
        req: HttpRequest,
        cancel: Option<&CancelHandle>,
    ) -> ApiResult<HttpResponse>;
}

// =========================================================
// 会话桥接 (Session Bridge)
// =========================================================

/// 客户端与会话/路由之间的桥接特性
///
/// 401 处理所需的三件事都经由此注入，便于在测试中替换：
/// 读取令牌、读取当前路径、使会话过期（清令牌 + 单次重定向并携带来源）。
pub trait SessionBridge {
    /// 当前持久化的访问令牌
    fn bearer_token(&self) -> Option<String>;
    /// 当前浏览器路径
    fn current_path(&self) -> String;
    /// 会话过期：清除令牌并重定向到登录页，`from` 为来源路径
    fn expire_session(&self, from: &str);
}

// =========================================================
// 实现层: Fetch 传输 (Production)
// =========================================================

/// 基于 `gloo-net` 的生产传输实现
pub struct FetchTransport;

#[async_trait::async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(
        &self,
        req: HttpRequest,
        cancel: Option<&CancelHandle>,
    ) -> ApiResult<HttpResponse> {
        use gloo_net::http::Request;

        let mut builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Put => Request::put(&req.url),
            HttpMethod::Delete => Request::delete(&req.url),
            HttpMethod::Patch => Request::patch(&req.url),
        };

        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let signal = cancel.map(|c| c.signal());
        builder = builder.abort_signal(signal.as_ref());

        let response = match req.body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(body)
                .map_err(|e| ApiError::network(e.to_string()))?
                .send()
                .await
                .map_err(|e| ApiError::network(e.to_string()))?,
            None => builder
                .send()
                .await
                .map_err(|e| ApiError::network(e.to_string()))?,
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// API 客户端
// =========================================================

pub struct ApiClient<T: HttpTransport> {
    base_url: String,
    transport: T,
    session: Rc<dyn SessionBridge>,
}

/// 生产环境使用的客户端别名
pub type AppApiClient = ApiClient<FetchTransport>;

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(base_url: String, transport: T, session: Rc<dyn SessionBridge>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            session,
        }
    }

    /// 拼接完整 URL（含查询串）
    fn url(&self, path: &str, query: &[(String, String)]) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&encode_query_value(value));
        }
        url
    }

    fn build_request<R: ApiRequest>(&self, req: &R) -> ApiResult<HttpRequest> {
        let mut headers = Vec::new();
        if let Some(token) = self.session.bearer_token() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        let body = if R::METHOD.has_body() {
            Some(serde_json::to_string(req).map_err(|e| ApiError::serialization(e.to_string()))?)
        } else {
            None
        };

        Ok(HttpRequest {
            method: R::METHOD,
            url: self.url(&req.path(), &req.query()),
            headers,
            body,
        })
    }

    /// 发送请求并解码响应，401 走全局处理
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        self.dispatch(req, None, true).await
    }

    /// 发送可取消的请求（长耗时调用使用）
    pub async fn send_with<R: ApiRequest>(
        &self,
        req: &R,
        cancel: Option<&CancelHandle>,
    ) -> ApiResult<R::Response> {
        self.dispatch(req, cancel, true).await
    }

    /// 发送请求但不触发全局 401 处理
    ///
    /// 仅会话引导/令牌刷新流程使用：这些流程需要在清除令牌之前
    /// 自行决定是否先尝试刷新。
    pub async fn send_silent<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        self.dispatch(req, None, false).await
    }

    /// 发送请求，失败后重试一次
    ///
    /// 仅供显式选择单次重试的读取（如用户查询）使用。
    pub async fn send_retry_once<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        match self.dispatch(req, None, true).await {
            Ok(value) => Ok(value),
            Err(first) if !first.is_unauthorized() => self.dispatch(req, None, true).await,
            Err(first) => Err(first),
        }
    }

    async fn dispatch<R: ApiRequest>(
        &self,
        req: &R,
        cancel: Option<&CancelHandle>,
        handle_auth: bool,
    ) -> ApiResult<R::Response> {
        let request = self.build_request(req)?;
        let response = self.transport.send(request, cancel).await?;

        if (200..300).contains(&response.status) {
            return decode_body(&response.body);
        }

        if response.status == 401 && handle_auth {
            self.handle_unauthorized();
        }

        Err(ApiError::from_response(response.status, &response.body))
    }

    /// 全局 401 处理
    ///
    /// 认证入口页面（登录/注册）自身的 401 不做任何处置，
    /// 否则登录失败会把用户再次"重定向"回登录页形成循环。
    fn handle_unauthorized(&self) {
        let path = self.session.current_path();
        if AppRoute::from_path(&path).is_auth_entry() {
            console_log("[Api] 401 at auth entry, state left untouched.");
            return;
        }
        self.session.expire_session(&path);
    }
}

/// 解码响应体；空响应体按 `null` 处理（204 等场景）
fn decode_body<D: DeserializeOwned>(body: &str) -> ApiResult<D> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::serialization(e.to_string()))
}

/// 查询串值的百分号编码（RFC 3986 非保留字符以外逐字节转义）
///
/// 过滤值可能含用户输入（如自由格式的经办人 id），`&`/`=`/空格
/// 直接拼接会破坏 URL 结构。
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

// =========================================================
// Context 集成
// =========================================================

/// 将客户端注入 Context，供资源 hooks 使用
///
/// 客户端内部持有 `Rc`，经 `SendWrapper` 满足 Context 的线程约束；
/// CSR 是单线程环境，wrapper 不会被跨线程访问。
pub fn provide_api(client: Rc<AppApiClient>) {
    leptos::prelude::provide_context(SendWrapper::new(client));
}

/// 从 Context 获取客户端
///
/// 展示层不得绕过 hooks 直接调用。
pub fn use_api() -> Rc<AppApiClient> {
    leptos::prelude::use_context::<SendWrapper<Rc<AppApiClient>>>()
        .expect("ApiClient should be provided at the app root")
        .take()
}
