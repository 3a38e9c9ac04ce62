//! AdminOne 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `adminone_shared`: 路由表、守卫、会话与 API（与平台无关）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态镜像
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod containers;
    pub mod dashboard;
    pub mod layout;
    pub mod login;
    pub mod placeholder;
    pub mod servers;
    pub mod snackbar;
}
pub mod logging;

use crate::auth::AuthContext;
use crate::components::containers::ContainersPage;
use crate::components::dashboard::DashboardPage;
use crate::components::layout::AuthenticatedLayout;
use crate::components::login::LoginPage;
use crate::components::placeholder::{ErrorPage, NotFoundPage, PlaceholderPage};
use crate::components::servers::ServersPage;
use crate::components::snackbar::{SnackbarContext, SnackbarHost};

use adminone_shared::AppRoute;
use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod http;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::{AbortScope, FetchTransport};
    pub use storage::BrowserStorage;
    pub use timer::Timeout;
}

use web::router::{Router, RouterOutlet};

const AUTHENTICATED_LAYOUT: &str = "authenticated";

/// 路由对应的页面内容
fn page(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Servers => view! { <ServersPage /> }.into_any(),
        AppRoute::Containers => view! { <ContainersPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Error => view! { <ErrorPage /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
        other => view! { <PlaceholderPage route=other /> }.into_any(),
    }
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件，声明了布局的路由套上外框。
fn route_matcher(route: AppRoute) -> AnyView {
    if route.effective_meta().layout == Some(AUTHENTICATED_LAYOUT) {
        view! { <AuthenticatedLayout route=route>{page(route)}</AuthenticatedLayout> }.into_any()
    } else {
        page(route)
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文（从 LocalStorage 恢复会话）
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    provide_context(SnackbarContext::new());

    view! {
        // 2. 路由器组件：注入会话信号实现守卫
        <Router session=auth_ctx.session_signal() abort_scope=auth_ctx.abort_scope()>
            <RouterOutlet matcher=route_matcher />
        </Router>
        <SnackbarHost />
    }
}
