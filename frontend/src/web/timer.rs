//! 定时器封装模块
//!
//! 使用 `web_sys` 的原生定时器 API 替代 `gloo-timers`。

use wasm_bindgen::prelude::*;

/// 一次性定时器
///
/// 封装 `setTimeout` API。当 `Timeout` 被 drop 时，若尚未触发则自动清除。
pub struct Timeout {
    handle: Option<i32>,
    closure: Option<Closure<dyn FnMut()>>,
}

impl Timeout {
    /// 创建新的一次性定时器
    ///
    /// 无法获取 window 对象或设置定时器失败时返回 `None`。
    pub fn new<F>(millis: u32, callback: F) -> Option<Self>
    where
        F: FnOnce() + 'static,
    {
        let mut callback = Some(callback);
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(callback) = callback.take() {
                callback();
            }
        });

        let handle = web_sys::window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis as i32,
            )
            .ok()?;

        Some(Self {
            handle: Some(handle),
            closure: Some(closure),
        })
    }

    /// 放弃所有权，定时器照常触发
    ///
    /// 闭包交由 JS 侧持有，用于不需要取消的场景。
    pub fn forget(mut self) {
        self.handle = None;
        if let Some(closure) = self.closure.take() {
            closure.forget();
        }
    }

    /// 取消定时器
    ///
    /// 通常不需要手动调用，因为 drop 时会自动清除。
    pub fn cancel(&self) {
        if let (Some(handle), Some(window)) = (self.handle, web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}
