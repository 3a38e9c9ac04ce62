//! 会话模块
//!
//! [`SessionStore`] 是会话的唯一写入者：内存状态与持久化存储同步更新。
//! HTTP 客户端读取令牌，导航守卫读取快照，界面层通过监听器感知变化。

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::storage::KeyValueStore;
use crate::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY, User};

/// 会话快照
///
/// `token` 存在即视为已认证。`user` 只在 `token` 存在时出现，
/// 但允许只有令牌没有用户资料（存储被部分写入时）。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn role(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.role.as_deref())
    }
}

/// 会话变化事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// 启动时从存储恢复
    Restored,
    LoggedIn,
    /// 用户主动注销
    LoggedOut,
    /// 服务器返回 401
    Expired,
}

type Listener = Box<dyn Fn(&Session, SessionEvent)>;

pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
    state: RefCell<Session>,
    listeners: RefCell<Vec<Listener>>,
}

impl SessionStore {
    /// 从持久化存储恢复会话
    ///
    /// 损坏的 `user` 条目会被丢弃，令牌本身仍然有效。
    pub fn restore(storage: impl KeyValueStore + 'static) -> Self {
        let token = storage.get(STORAGE_TOKEN_KEY).filter(|t| !t.is_empty());
        let user = match (&token, storage.get(STORAGE_USER_KEY)) {
            (Some(_), Some(raw)) => match serde_json::from_str::<Option<User>>(&raw) {
                Ok(user) => user,
                Err(e) => {
                    warn!(error = %e, "[Session] Dropping corrupt user entry.");
                    storage.remove(STORAGE_USER_KEY);
                    None
                }
            },
            _ => None,
        };

        if token.is_some() {
            info!(has_user = user.is_some(), "[Session] Restored from storage.");
        }

        Self {
            storage: Box::new(storage),
            state: RefCell::new(Session { token, user }),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// 注册会话变化监听器
    pub fn subscribe(&self, listener: impl Fn(&Session, SessionEvent) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// 建立会话：先写存储，成功后再更新内存
    ///
    /// 存储写入失败时内存状态保持不变。
    pub fn establish(&self, token: String, user: User) -> ApiResult<()> {
        if token.is_empty() {
            return Err(ApiError::invalid_input("empty session token").in_op("session.establish"));
        }
        let user_json = serde_json::to_string(&user)
            .map_err(|e| ApiError::serialization(e.to_string()).in_op("session.establish"))?;

        self.storage
            .set(STORAGE_TOKEN_KEY, &token)
            .map_err(|e| e.in_op("session.establish"))?;
        if let Err(e) = self.storage.set(STORAGE_USER_KEY, &user_json) {
            self.storage.remove(STORAGE_TOKEN_KEY);
            return Err(e.in_op("session.establish"));
        }

        *self.state.borrow_mut() = Session {
            token: Some(token),
            user: Some(user),
        };
        info!("[Session] Logged in.");
        self.notify(SessionEvent::LoggedIn);
        Ok(())
    }

    /// 主动注销，无条件清除
    pub fn logout(&self) {
        self.clear(SessionEvent::LoggedOut);
    }

    /// 服务器拒绝令牌，清除会话
    pub fn expire(&self) {
        self.clear(SessionEvent::Expired);
    }

    fn clear(&self, event: SessionEvent) {
        self.storage.remove(STORAGE_TOKEN_KEY);
        self.storage.remove(STORAGE_USER_KEY);
        let was_authenticated = {
            let mut state = self.state.borrow_mut();
            let was = state.is_authenticated();
            *state = Session::default();
            was
        };
        match event {
            SessionEvent::Expired => warn!(was_authenticated, "[Session] Expired by server."),
            _ => info!(was_authenticated, "[Session] Cleared."),
        }
        self.notify(event);
    }

    /// 通知监听器（不持有状态借用，监听器可回读会话）
    fn notify(&self, event: SessionEvent) {
        let snapshot = self.snapshot();
        for listener in self.listeners.borrow().iter() {
            listener(&snapshot, event);
        }
    }
}
