//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，验证由共享层的守卫完成。

use std::rc::Rc;

use adminone_shared::guard::{NavigationDecision, NavigationFailure, Recovery, resolve};
use adminone_shared::{AppRoute, Session};
use leptos::prelude::*;
use tracing::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::http::AbortScope;

/// 获取当前浏览器路径（含查询串）
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| {
            let location = w.location();
            let path = location.pathname().ok()?;
            let search = location.search().unwrap_or_default();
            Some(format!("{}{}", path, search))
        })
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 守卫放行时保留原始路径（查询串等），重定向时使用目标的规范路径
fn history_path(decision: NavigationDecision, requested: &str) -> String {
    match decision {
        NavigationDecision::Proceed(route) if AppRoute::from_path(requested) == route => {
            requested.to_string()
        }
        other => other.destination().to_path().to_string(),
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话快照（注入的信号，实现解耦）
    session: Signal<Session>,
    /// 路由切换时取消进行中的请求
    abort_scope: StoredValue<Rc<AbortScope>, LocalStorage>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// 首个路由在挂载前就经过守卫，被拒绝的视图不会被渲染。
    fn new(session: Signal<Session>, abort_scope: StoredValue<Rc<AbortScope>, LocalStorage>) -> Self {
        let path = current_path();
        let decision = resolve(AppRoute::from_path(&path), &session.get_untracked());
        if decision.is_redirect() {
            replace_history_state(decision.destination().to_path());
        }
        let (current_route, set_route) = signal(decision.destination());

        Self {
            current_route,
            set_route,
            session,
            abort_scope,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to(path, true);
    }

    /// 导航到指定路径
    ///
    /// # Arguments
    /// * `path` - 目标路径
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to(&self, path: &str, use_push: bool) {
        let target = AppRoute::from_path(path);

        // --- Step 1: 验证目标路由 ---
        let decision = resolve(target, &self.session.get_untracked());
        if let NavigationDecision::Redirect { to, reason } = decision {
            debug!(from = %target, to = %to, ?reason, "[Router] Redirecting.");
        }

        // --- Step 2: 取消旧页面的请求 ---
        if decision.destination() != self.current_route.get_untracked() {
            self.abort_scope.with_value(|scope| scope.abort_all());
        }

        // --- Step 3: 加载页面 (更新状态) ---
        let url = history_path(decision, path);
        if use_push {
            push_history_state(&url);
        } else {
            replace_history_state(&url);
        }
        self.set_route.set(decision.destination());
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let session = self.session;
        let abort_scope = self.abort_scope;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            // popstate 时也执行守卫逻辑
            let decision = resolve(AppRoute::from_path(&path), &session.get_untracked());
            if decision.is_redirect() {
                replace_history_state(decision.destination().to_path());
            }
            abort_scope.with_value(|scope| scope.abort_all());
            set_route.set(decision.destination());
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置会话变化时的自动重定向
    ///
    /// 登录后离开登录页；注销或令牌过期后离开受保护页面。
    ///
    /// 重定向替换当前历史记录，后退不会回到已失效的页面。
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let decision = router
                .session
                .with(|s| resolve(router.current_route.get_untracked(), s));
            if let NavigationDecision::Redirect { to, reason } = decision {
                info!(to = %to, ?reason, "[Router] Session changed, redirecting.");
                router.navigate_to(to.to_path(), false);
            }
        });
    }

    /// 处理视图模块加载失败
    ///
    /// 过期的构建产物触发整页刷新，其他错误只记录。
    fn init_error_listener(&self) {
        fn handle(message: String) {
            if NavigationFailure::classify(&message).recovery() == Recovery::Reload {
                if let Some(window) = web_sys::window() {
                    let _ = window.location().reload();
                }
            }
        }

        let on_error = Closure::<dyn Fn(web_sys::ErrorEvent)>::new(move |ev: web_sys::ErrorEvent| {
            handle(ev.message());
        });
        let on_rejection =
            Closure::<dyn Fn(web_sys::PromiseRejectionEvent)>::new(move |ev: web_sys::PromiseRejectionEvent| {
                let reason = ev.reason();
                handle(reason.as_string().unwrap_or_else(|| format!("{:?}", reason)));
            });

        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref());
            let _ = window.add_event_listener_with_callback(
                "unhandledrejection",
                on_rejection.as_ref().unchecked_ref(),
            );
        }

        on_error.forget();
        on_rejection.forget();
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(
    session: Signal<Session>,
    abort_scope: StoredValue<Rc<AbortScope>, LocalStorage>,
) -> RouterService {
    let router = RouterService::new(session, abort_scope);

    // 初始化监听器
    router.init_popstate_listener();
    router.init_error_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Session>,
    /// 请求取消范围
    abort_scope: StoredValue<Rc<AbortScope>, LocalStorage>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    // 提供路由服务到 Context
    provide_router(session, abort_scope);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() {
            return;
        }
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
