//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其元数据（认证要求、角色、标题、布局）。

use std::fmt::Display;

use crate::ROLE_ADMIN;

const ADMIN_ONLY: &[&str] = &[ROLE_ADMIN];
const AUTHENTICATED_LAYOUT: &str = "authenticated";

/// 路由元数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    /// 允许访问的角色；`None` 表示任何已认证角色
    pub roles: Option<&'static [&'static str]>,
    pub title: &'static str,
    pub layout: Option<&'static str>,
}

impl RouteMeta {
    const fn public(title: &'static str) -> Self {
        Self {
            requires_auth: false,
            roles: None,
            title,
            layout: None,
        }
    }

    const fn protected(title: &'static str) -> Self {
        Self {
            requires_auth: true,
            roles: None,
            title,
            layout: Some(AUTHENTICATED_LAYOUT),
        }
    }

    const fn admin(title: &'static str) -> Self {
        Self {
            requires_auth: true,
            roles: Some(ADMIN_ONLY),
            title,
            layout: Some(AUTHENTICATED_LAYOUT),
        }
    }

    pub fn permits_role(&self, role: Option<&str>) -> bool {
        match self.roles {
            None => true,
            Some(roles) => role.is_some_and(|r| roles.contains(&r)),
        }
    }
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    Dashboard,
    Profile,
    Users,
    UsersAdd,
    Servers,
    Containers,
    ContainersAdd,
    Traffic,
    Alerts,
    System,
    SystemLogs,
    SystemHa,
    Serials,
    Rental,
    Acl,
    AclGenerate,
    Error,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    pub const ALL: [AppRoute; 19] = [
        AppRoute::Login,
        AppRoute::Dashboard,
        AppRoute::Profile,
        AppRoute::Users,
        AppRoute::UsersAdd,
        AppRoute::Servers,
        AppRoute::Containers,
        AppRoute::ContainersAdd,
        AppRoute::Traffic,
        AppRoute::Alerts,
        AppRoute::System,
        AppRoute::SystemLogs,
        AppRoute::SystemHa,
        AppRoute::Serials,
        AppRoute::Rental,
        AppRoute::Acl,
        AppRoute::AclGenerate,
        AppRoute::Error,
        AppRoute::NotFound,
    ];

    /// 将 URL path 解析为路由枚举
    ///
    /// 忽略查询串、片段和结尾的 `/`。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let path = path.trim_end_matches('/');
        match path {
            "" | "/dashboard" => Self::Dashboard,
            "/login" => Self::Login,
            "/profile" => Self::Profile,
            "/users" => Self::Users,
            "/users/add" => Self::UsersAdd,
            "/servers/list" => Self::Servers,
            "/containers" => Self::Containers,
            "/containers/add" => Self::ContainersAdd,
            "/traffic" => Self::Traffic,
            "/alerts" => Self::Alerts,
            "/system" => Self::System,
            "/system/logs" => Self::SystemLogs,
            "/system/ha" => Self::SystemHa,
            "/serial" | "/serials/manage" => Self::Serials,
            "/rental" => Self::Rental,
            "/acl" => Self::Acl,
            "/acl/generate" => Self::AclGenerate,
            "/error" => Self::Error,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的规范 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::Users => "/users",
            Self::UsersAdd => "/users/add",
            Self::Servers => "/servers/list",
            Self::Containers => "/containers",
            Self::ContainersAdd => "/containers/add",
            Self::Traffic => "/traffic",
            Self::Alerts => "/alerts",
            Self::System => "/system",
            Self::SystemLogs => "/system/logs",
            Self::SystemHa => "/system/ha",
            Self::Serials => "/serial",
            Self::Rental => "/rental",
            Self::Acl => "/acl",
            Self::AclGenerate => "/acl/generate",
            Self::Error => "/error",
            Self::NotFound => "/404",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Dashboard => "dashboard",
            Self::Profile => "profile",
            Self::Users => "users",
            Self::UsersAdd => "users-add",
            Self::Servers => "servers.list",
            Self::Containers => "containers",
            Self::ContainersAdd => "containers-add",
            Self::Traffic => "traffic",
            Self::Alerts => "alerts",
            Self::System => "system",
            Self::SystemLogs => "system-logs",
            Self::SystemHa => "system-ha",
            Self::Serials => "serial",
            Self::Rental => "rental",
            Self::Acl => "acl",
            Self::AclGenerate => "acl-generate",
            Self::Error => "error",
            Self::NotFound => "not-found",
        }
    }

    /// 嵌套路由的父路由
    pub fn parent(&self) -> Option<AppRoute> {
        match self {
            Self::SystemLogs | Self::SystemHa => Some(Self::System),
            _ => None,
        }
    }

    /// 路由自身声明的元数据
    pub fn meta(&self) -> RouteMeta {
        match self {
            Self::Login => RouteMeta::public("Login"),
            Self::Dashboard => RouteMeta::protected("Dashboard"),
            Self::Profile => RouteMeta::protected("Profile"),
            Self::Users => RouteMeta::admin("Users"),
            Self::UsersAdd => RouteMeta::admin("Add user"),
            Self::Servers => RouteMeta::protected("Servers"),
            Self::Containers => RouteMeta::protected("Containers"),
            Self::ContainersAdd => RouteMeta::protected("New container"),
            Self::Traffic => RouteMeta::protected("Traffic"),
            Self::Alerts => RouteMeta::protected("Alerts"),
            Self::System => RouteMeta::admin("System"),
            Self::SystemLogs => RouteMeta::public("System logs"),
            Self::SystemHa => RouteMeta::public("High availability"),
            Self::Serials => RouteMeta::admin("Serial codes"),
            Self::Rental => RouteMeta::protected("Rentals"),
            Self::Acl => RouteMeta::protected("ACL"),
            Self::AclGenerate => RouteMeta::admin("Generate ACL"),
            Self::Error => RouteMeta::public("Error"),
            Self::NotFound => RouteMeta::public("Not found"),
        }
    }

    /// **核心守卫输入：合并父路由后的有效元数据**
    ///
    /// 子路由继承父路由的认证要求、角色和布局。
    pub fn effective_meta(&self) -> RouteMeta {
        let own = self.meta();
        match self.parent() {
            None => own,
            Some(parent) => {
                let inherited = parent.effective_meta();
                RouteMeta {
                    requires_auth: own.requires_auth || inherited.requires_auth,
                    roles: own.roles.or(inherited.roles),
                    title: own.title,
                    layout: own.layout.or(inherited.layout),
                }
            }
        }
    }

    pub fn requires_auth(&self) -> bool {
        self.effective_meta().requires_auth
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功或角色不足时的重定向目标
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn canonical_paths_round_trip() {
        for route in AppRoute::ALL {
            if route == AppRoute::NotFound {
                continue;
            }
            assert_eq!(AppRoute::from_path(route.to_path()), route, "{:?}", route);
        }
    }

    #[test]
    fn paths_and_names_are_unique() {
        let paths: HashSet<_> = AppRoute::ALL.iter().map(AppRoute::to_path).collect();
        let names: HashSet<_> = AppRoute::ALL.iter().map(AppRoute::name).collect();
        assert_eq!(paths.len(), AppRoute::ALL.len());
        assert_eq!(names.len(), AppRoute::ALL.len());
    }

    #[test]
    fn aliases_and_noise_are_normalized() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path(""), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/serials/manage"), AppRoute::Serials);
        assert_eq!(AppRoute::from_path("/containers/"), AppRoute::Containers);
        assert_eq!(AppRoute::from_path("/acl?user=3#top"), AppRoute::Acl);
        assert_eq!(AppRoute::from_path("/nowhere"), AppRoute::NotFound);
    }

    #[test]
    fn children_inherit_auth_and_roles() {
        let meta = AppRoute::SystemLogs.effective_meta();
        assert!(meta.requires_auth);
        assert_eq!(meta.roles, Some(ADMIN_ONLY));
        assert_eq!(meta.title, "System logs");
        assert_eq!(meta.layout, Some("authenticated"));
    }

    #[test]
    fn declared_roles_are_never_empty() {
        for route in AppRoute::ALL {
            if let Some(roles) = route.effective_meta().roles {
                assert!(!roles.is_empty(), "{:?}", route);
            }
        }
    }

    #[test]
    fn role_membership() {
        let meta = AppRoute::Users.meta();
        assert!(meta.permits_role(Some("admin")));
        assert!(!meta.permits_role(Some("user")));
        assert!(!meta.permits_role(None));
        assert!(AppRoute::Traffic.meta().permits_role(None));
    }
}
