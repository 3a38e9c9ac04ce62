//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 替代 `gloo-storage`，为会话提供持久化后端。

use adminone_shared::{ApiError, ApiResult, KeyValueStore};

/// 浏览器 LocalStorage
///
/// 无状态，每次操作都重新获取 `window.localStorage`。
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 隐私模式或配额耗尽时写入会失败
    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        let storage = Self::storage()
            .ok_or_else(|| ApiError::storage("localStorage is unavailable").in_op_with("storage.set", key))?;
        storage.set_item(key, value).map_err(|e| {
            ApiError::storage(format!("{:?}", e)).in_op_with("storage.set", key)
        })
    }

    fn remove(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
