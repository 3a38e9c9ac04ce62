//! 持久化键值存储抽象
//!
//! 浏览器中由 LocalStorage 实现，测试与非浏览器环境使用 [`MemoryStorage`]。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{ApiError, ApiResult};

pub trait KeyValueStore {
    /// 获取存储的字符串值，键不存在或读取失败时返回 `None`
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> ApiResult<()>;

    /// 删除键值对，返回操作是否成功
    fn remove(&self, key: &str) -> bool;
}

/// 内存存储
///
/// 克隆共享同一份数据，便于在交给会话后继续检查内容。
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟存储写入失败（如浏览器配额耗尽）
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        if self.fail_writes.get() {
            return Err(ApiError::storage("storage is read-only").in_op_with("storage.set", key));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> bool {
        (**self).remove(key)
    }
}
