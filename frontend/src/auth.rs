//! 认证模块
//!
//! 会话本身由共享层的 [`SessionStore`] 持有，这里只把它镜像成信号，
//! 并通过 Context 向组件提供 API 客户端。路由服务只依赖注入的会话信号。

use std::rc::Rc;
use std::time::Duration;

use adminone_shared::directory::ServerDirectory;
use adminone_shared::{AdminApi, ApiClient, ApiResult, ClientConfig, Session, SessionStore, User, auth};
use leptos::prelude::*;
use tracing::{debug, info};

use crate::web::{AbortScope, BrowserStorage, FetchTransport};

pub type Api = AdminApi<FetchTransport>;

/// 编译期可覆盖的后端地址
fn client_config() -> ClientConfig {
    let config = ClientConfig::default();
    match option_env!("ADMINONE_API_BASE") {
        Some(base) if !base.is_empty() => config.with_base_url(base),
        _ => config,
    }
}

/// 认证上下文
///
/// 信号部分可在组件间自由复制；API 客户端等非 `Send` 对象放在本地存储的
/// `StoredValue` 中。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话快照（只读）
    session: ReadSignal<Session>,
    api: StoredValue<Rc<Api>, LocalStorage>,
    abort_scope: StoredValue<Rc<AbortScope>, LocalStorage>,
    directory: StoredValue<Rc<ServerDirectory>, LocalStorage>,
}

impl AuthContext {
    /// 创建认证上下文
    ///
    /// 会话在第一次受保护的导航之前从 LocalStorage 恢复。
    pub fn new() -> Self {
        let config = client_config();
        let timeout: Duration = config.timeout;
        let store = Rc::new(SessionStore::restore(BrowserStorage));
        let (session, set_session) = signal(store.snapshot());

        store.subscribe(move |snapshot, event| {
            debug!(?event, "[Auth] Session changed.");
            set_session.set(snapshot.clone());
        });

        let abort_scope = Rc::new(AbortScope::new());
        let transport = FetchTransport::new(abort_scope.clone(), timeout);
        let api = Rc::new(AdminApi::new(ApiClient::new(config, store, transport)));

        Self {
            session,
            api: StoredValue::new_local(api),
            abort_scope: StoredValue::new_local(abort_scope),
            directory: StoredValue::new_local(Rc::new(ServerDirectory::new())),
        }
    }

    /// 获取会话信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Session> {
        self.session.into()
    }

    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(Session::is_authenticated))
    }

    pub fn user_signal(&self) -> Signal<Option<User>> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.user.clone()))
    }

    pub fn api(&self) -> Rc<Api> {
        self.api.get_value()
    }

    pub fn abort_scope(&self) -> StoredValue<Rc<AbortScope>, LocalStorage> {
        self.abort_scope
    }

    pub fn directory(&self) -> Rc<ServerDirectory> {
        self.directory.get_value()
    }

    /// 登录
    ///
    /// 成功后会话监听器更新信号，路由服务随之离开登录页。
    pub async fn login(&self, email: String, password: String) -> ApiResult<User> {
        let api = self.api();
        auth::login(&*api, &email, &password).await
    }

    /// 注销并清除状态
    ///
    /// 导航将由路由服务的会话监听自动处理。
    pub fn logout(&self) {
        info!("[Auth] Logging out.");
        auth::logout(self.api().as_ref());
        self.directory().clear();
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}
