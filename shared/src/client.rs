//! HTTP 客户端门面
//!
//! 所有出站请求的唯一出口：
//! 1. 请求拦截：从会话读取令牌，附加 `Authorization: Bearer <token>`
//! 2. 发送：通过注入的 [`Transport`]，幂等读请求在网络失败时有限重试
//! 3. 响应拦截：401 清除会话后仍返回错误；其他非 2xx 归类为 HTTP 错误；
//!    2xx 直接返回 JSON 响应体

use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::protocol::{ApiCall, ApiEnvelope, HttpRequest, HttpResponse, LoginEnvelope};
use crate::session::SessionStore;
use crate::HEADER_AUTHORIZATION;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::{BTreeMap, HashMap, VecDeque};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 网络传输层
///
/// 浏览器中由 fetch 实现；超时与取消都以 `Transport` 错误的形式返回。
#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

#[async_trait::async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for Rc<T> {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).send(req).await
    }
}

// =========================================================
// 客户端门面
// =========================================================

pub struct ApiClient<T> {
    config: ClientConfig,
    session: Rc<SessionStore>,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: ClientConfig, session: Rc<SessionStore>, transport: T) -> Self {
        Self {
            config,
            session,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Rc<SessionStore> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 请求拦截：构造带认证头的原始请求
    fn prepare(&self, call: &ApiCall) -> HttpRequest {
        let url = self.config.url(&call.path_and_query());
        let mut req =
            HttpRequest::new(&url, call.method).with_header("Content-Type", "application/json");

        if let Some(token) = self.session.token() {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        if let Some(body) = &call.body {
            req = req.with_body(body);
        }
        req
    }

    /// 发送请求，返回原始 JSON 响应体
    pub async fn execute(&self, call: &ApiCall) -> ApiResult<Value> {
        let attempts = if call.method.is_idempotent_read() {
            1 + self.config.retry.max_retries
        } else {
            1
        };

        let mut attempt = 1;
        let response = loop {
            let req = self.prepare(call);
            debug!(method = %call.method, path = %call.path, attempt, "[Client] Dispatching request.");

            match self.transport.send(req).await {
                Ok(response) => break response,
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!(path = %call.path, attempt, error = %e, "[Client] Transport failure, retrying.");
                    attempt += 1;
                }
                Err(e) => return Err(e.in_op_with("client.send", call.path.clone())),
            }
        };

        self.classify(call, response)
    }

    /// 响应拦截
    fn classify(&self, call: &ApiCall, response: HttpResponse) -> ApiResult<Value> {
        if response.status == 401 {
            warn!(path = %call.path, "[Client] 401 received, clearing session.");
            self.session.expire();
            return Err(ApiError::unauthorized(response.error_message())
                .in_op_with("client.response", call.path.clone()));
        }

        if !response.ok() {
            return Err(ApiError::http(response.status, response.error_message())
                .in_op_with("client.response", call.path.clone()));
        }

        response
            .json()
            .map_err(|e| e.in_op_with("client.response", call.path.clone()))
    }

    /// 发送请求并按统一信封归一化
    pub async fn fetch(&self, call: ApiCall) -> ApiResult<Value> {
        let body = self.execute(&call).await?;
        ApiEnvelope::from_body(body)
            .into_result()
            .map_err(|e| e.in_op_with("client.envelope", call.path.clone()))
    }

    /// 登录接口的专用归一化
    pub async fn fetch_login(&self, call: ApiCall) -> ApiResult<LoginEnvelope> {
        debug_assert!(call.is_login());
        let body = self.execute(&call).await?;
        LoginEnvelope::from_body(body).map_err(|e| e.in_op("client.login"))
    }
}

// =========================================================
// 测试工具: MockTransport
// =========================================================

#[cfg(test)]
pub struct MockTransport {
    /// URL -> 依次返回的响应队列，最后一个会被重复使用
    responses: RefCell<HashMap<String, VecDeque<ApiResult<(u16, String)>>>>,
    /// 记录发出的请求 (URL, Method, Headers, Body)
    pub requests: RefCell<Vec<(String, String, BTreeMap<String, String>, Option<String>)>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: Value) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(Ok((status, body.to_string())));
    }

    /// 原样返回响应体文本（不经 JSON 序列化）
    pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(Ok((status, body.to_string())));
    }

    pub fn mock_failure(&self, url: &str, message: &str) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(Err(ApiError::transport(message)));
    }

    pub fn last_request(&self) -> (String, String, BTreeMap<String, String>, Option<String>) {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.borrow_mut().push((
            req.url.clone(),
            req.method.to_string(),
            req.headers.clone(),
            req.body.clone(),
        ));

        let mut responses = self.responses.borrow_mut();
        let Some(queue) = responses.get_mut(&req.url) else {
            return Ok(HttpResponse::new(404, "Not Found"));
        };
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(|r| match r {
                Ok(ok) => Ok(ok.clone()),
                Err(e) => Err(ApiError::transport(e.message())),
            })
        };
        match next {
            Some(Ok((status, body))) => Ok(HttpResponse::new(status, body)),
            Some(Err(e)) => Err(e),
            None => Ok(HttpResponse::new(404, "Not Found")),
        }
    }
}

#[cfg(test)]
mod tests;
