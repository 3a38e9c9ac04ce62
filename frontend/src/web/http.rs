//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现共享层的 [`Transport`]。每个请求都挂在
//! [`AbortScope`] 上，路由切换时统一取消仍在进行的请求。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use adminone_shared::protocol::{HttpRequest, HttpResponse};
use adminone_shared::{ApiError, ApiResult, Transport};
use async_trait::async_trait;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response};

use super::timer::Timeout;

// =========================================================
// 取消范围
// =========================================================

/// 进行中请求的取消范围
#[derive(Default)]
pub struct AbortScope {
    next_id: Cell<u64>,
    in_flight: RefCell<HashMap<u64, AbortController>>,
}

impl AbortScope {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self) -> Option<(u64, AbortController)> {
        let controller = AbortController::new().ok()?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.in_flight.borrow_mut().insert(id, controller.clone());
        Some((id, controller))
    }

    fn release(&self, id: u64) {
        self.in_flight.borrow_mut().remove(&id);
    }

    /// 取消所有进行中的请求
    pub fn abort_all(&self) {
        let controllers: Vec<_> = self.in_flight.borrow_mut().drain().map(|(_, c)| c).collect();
        if !controllers.is_empty() {
            debug!(count = controllers.len(), "[Http] Aborting in-flight requests.");
        }
        for controller in controllers {
            controller.abort();
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.borrow().len()
    }
}

// =========================================================
// Fetch 传输层
// =========================================================

pub struct FetchTransport {
    scope: Rc<AbortScope>,
    timeout: Duration,
}

impl FetchTransport {
    pub fn new(scope: Rc<AbortScope>, timeout: Duration) -> Self {
        Self { scope, timeout }
    }

    fn build_request(req: &HttpRequest, controller: Option<&AbortController>) -> ApiResult<Request> {
        let headers = Headers::new()
            .map_err(|e| ApiError::transport(format!("创建 Headers 失败: {:?}", e)))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| ApiError::transport(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }
        if let Some(controller) = controller {
            opts.set_signal(Some(&controller.signal()));
        }

        Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| ApiError::transport(format!("{:?}", e)))
    }

    async fn dispatch(request: &Request) -> ApiResult<HttpResponse> {
        let window = web_sys::window().ok_or_else(|| ApiError::transport("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(request))
            .await
            .map_err(|e| ApiError::transport(format!("{:?}", e)))?;
        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ApiError::decode(format!("Response 类型转换失败: {:?}", e)))?;

        let status = response.status();
        let promise = response
            .text()
            .map_err(|e| ApiError::decode(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| ApiError::transport(format!("{:?}", e)))?;

        Ok(HttpResponse::new(status, text.as_string().unwrap_or_default()))
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let registered = self.scope.register();
        let controller = registered.as_ref().map(|(_, c)| c.clone());
        // 超时通过同一个 AbortController 取消
        let timed_out = Rc::new(Cell::new(false));
        let _timeout = controller.clone().and_then(|controller| {
            let timed_out = timed_out.clone();
            Timeout::new(u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX), move || {
                timed_out.set(true);
                controller.abort();
            })
        });

        let result = match Self::build_request(&req, controller.as_ref()) {
            Ok(request) => Self::dispatch(&request).await,
            Err(e) => Err(e.in_op("fetch.build")),
        };
        if let Some((id, _)) = registered {
            self.scope.release(id);
        }

        result.map_err(|e| {
            let e = if timed_out.get() {
                ApiError::transport(format!("request timed out after {:?}", self.timeout))
            } else if controller.is_some_and(|c| c.signal().aborted()) {
                ApiError::aborted("request aborted by navigation")
            } else {
                e
            };
            e.in_op_with("fetch.send", req.url.clone())
        })
    }
}
