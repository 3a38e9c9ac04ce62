//! 导航守卫
//!
//! 每次导航在目标视图挂载之前求值，顺序固定：
//! 1. 需要认证但没有令牌 -> 登录页
//! 2. 声明了角色但当前用户角色不在其中 -> 控制面板
//! 3. 已认证却访问登录页 -> 控制面板
//! 4. 放行

use tracing::{debug, error, warn};

use crate::route::AppRoute;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    NotAuthenticated,
    RoleNotPermitted,
    AlreadyAuthenticated,
}

/// 守卫的裁决
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed(AppRoute),
    Redirect {
        to: AppRoute,
        reason: RedirectReason,
    },
}

impl NavigationDecision {
    /// 最终要渲染的路由
    pub fn destination(&self) -> AppRoute {
        match self {
            NavigationDecision::Proceed(route) => *route,
            NavigationDecision::Redirect { to, .. } => *to,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, NavigationDecision::Redirect { .. })
    }
}

/// **核心守卫逻辑**
///
/// 认证检查严格先于角色检查。重定向目标（登录页、控制面板）本身
/// 不会再触发同类重定向，因此不会形成循环。
pub fn resolve(target: AppRoute, session: &Session) -> NavigationDecision {
    let meta = target.effective_meta();

    if meta.requires_auth && !session.is_authenticated() {
        debug!(target = %target, "[Guard] Access denied, redirecting to login.");
        return NavigationDecision::Redirect {
            to: AppRoute::auth_failure_redirect(),
            reason: RedirectReason::NotAuthenticated,
        };
    }

    if meta.roles.is_some() && !meta.permits_role(session.role()) {
        debug!(target = %target, role = ?session.role(), "[Guard] Role not permitted, redirecting to dashboard.");
        return NavigationDecision::Redirect {
            to: AppRoute::auth_success_redirect(),
            reason: RedirectReason::RoleNotPermitted,
        };
    }

    if target.should_redirect_when_authenticated() && session.is_authenticated() {
        debug!("[Guard] Already authenticated, redirecting to dashboard.");
        return NavigationDecision::Redirect {
            to: AppRoute::auth_success_redirect(),
            reason: RedirectReason::AlreadyAuthenticated,
        };
    }

    NavigationDecision::Proceed(target)
}

// =========================================================
// 导航失败处理
// =========================================================

/// 浏览器在加载过期的分块资源时给出的错误片段
const MODULE_LOAD_MARKERS: [&str; 4] = [
    "Failed to fetch dynamically imported module",
    "error loading dynamically imported module",
    "Importing a module script failed",
    "Failed to fetch wasm",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationFailure {
    /// 视图模块加载失败，通常是缓存了过期的构建产物
    ModuleLoad(String),
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// 整页重新加载
    Reload,
    /// 记录后忽略
    Ignore,
}

impl NavigationFailure {
    pub fn classify(message: &str) -> Self {
        if MODULE_LOAD_MARKERS.iter().any(|m| message.contains(m)) {
            NavigationFailure::ModuleLoad(message.to_string())
        } else {
            NavigationFailure::Other(message.to_string())
        }
    }

    pub fn recovery(&self) -> Recovery {
        match self {
            NavigationFailure::ModuleLoad(msg) => {
                error!(error = %msg, "[Router] Module load failed, reloading page.");
                Recovery::Reload
            }
            NavigationFailure::Other(msg) => {
                warn!(error = %msg, "[Router] Navigation error.");
                Recovery::Ignore
            }
        }
    }
}
