//! 菜单数据
//!
//! 侧边栏与顶部导航栏的静态定义。除了按当前路径查找激活项之外没有逻辑。

use crate::route::AppRoute;

/// 菜单图标标识，由界面层映射为具体图标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Home,
    AccountGroup,
    Server,
    Docker,
    ChartLine,
    Bell,
    Key,
    Cash,
    ShieldAccount,
    Cog,
    Account,
    CogOutline,
    Logout,
    ThemeLightDark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    /// 普通链接或分组
    Link,
    /// 显示当前用户名的下拉入口
    CurrentUser,
    Divider,
    Logout,
    ToggleLightDark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub to: Option<&'static str>,
    pub icon: Option<Icon>,
    pub label: &'static str,
    pub menu: &'static [MenuItem],
    pub kind: MenuKind,
    /// 桌面端只显示图标
    pub desktop_no_label: bool,
}

impl MenuItem {
    const fn link(to: &'static str, icon: Option<Icon>, label: &'static str) -> Self {
        Self {
            to: Some(to),
            icon,
            label,
            menu: &[],
            kind: MenuKind::Link,
            desktop_no_label: false,
        }
    }

    const fn group(icon: Icon, label: &'static str, menu: &'static [MenuItem]) -> Self {
        Self {
            to: None,
            icon: Some(icon),
            label,
            menu,
            kind: MenuKind::Link,
            desktop_no_label: false,
        }
    }

    const fn action(kind: MenuKind, icon: Option<Icon>, label: &'static str) -> Self {
        Self {
            to: None,
            icon,
            label,
            menu: &[],
            kind,
            desktop_no_label: false,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.menu.is_empty()
    }

    /// 自身或任一子项指向 `path`
    pub fn contains_path(&self, path: &str) -> bool {
        let path = normalize(path);
        self.to.is_some_and(|to| normalize(to) == path)
            || self.menu.iter().any(|child| child.contains_path(&path))
    }
}

/// 统一别名（如 `/` 与 `/dashboard`），未知路径原样比较
fn normalize(path: &str) -> String {
    match AppRoute::from_path(path) {
        AppRoute::NotFound => path.split(['?', '#']).next().unwrap_or("").trim_end_matches('/').to_string(),
        route => route.to_path().to_string(),
    }
}

const USERS_MENU: &[MenuItem] = &[
    MenuItem::link("/users", None, "用户列表"),
    MenuItem::link("/users/distributor", None, "分销商管理"),
];

const SYSTEM_MENU: &[MenuItem] = &[
    MenuItem::link("/system", None, "系统概览"),
    MenuItem::link("/system/logs", None, "系统日志"),
    MenuItem::link("/system/ha", None, "高可用"),
];

const CURRENT_USER_MENU: &[MenuItem] = &[
    MenuItem::link("/profile", Some(Icon::Account), "我的账户"),
    MenuItem::link("/settings", Some(Icon::CogOutline), "设置"),
    MenuItem::action(MenuKind::Divider, None, ""),
    MenuItem::action(MenuKind::Logout, Some(Icon::Logout), "退出"),
];

pub static ASIDE_MENU: &[MenuItem] = &[
    MenuItem::link("/dashboard", Some(Icon::Home), "首页"),
    MenuItem::group(Icon::AccountGroup, "用户管理", USERS_MENU),
    MenuItem::link("/servers/list", Some(Icon::Server), "服务器管理"),
    MenuItem::link("/containers", Some(Icon::Docker), "容器管理"),
    MenuItem::link("/traffic", Some(Icon::ChartLine), "流量监控"),
    MenuItem::link("/alerts", Some(Icon::Bell), "告警管理"),
    MenuItem::link("/serial", Some(Icon::Key), "序列号管理"),
    MenuItem::link("/rental", Some(Icon::Cash), "租赁管理"),
    MenuItem::link("/acl", Some(Icon::ShieldAccount), "ACL 管理"),
    MenuItem::group(Icon::Cog, "系统管理", SYSTEM_MENU),
];

pub static NAVBAR_MENU: &[MenuItem] = &[
    MenuItem {
        menu: CURRENT_USER_MENU,
        ..MenuItem::action(MenuKind::CurrentUser, None, "admin")
    },
    MenuItem {
        desktop_no_label: true,
        ..MenuItem::action(MenuKind::ToggleLightDark, Some(Icon::ThemeLightDark), "主题切换")
    },
];

/// 查找 `to` 与当前路径匹配的最深层菜单项
pub fn find_active(menu: &'static [MenuItem], path: &str) -> Option<&'static MenuItem> {
    let path = normalize(path);
    menu.iter().find_map(|item| {
        find_active(item.menu, &path)
            .or_else(|| item.to.filter(|to| normalize(to) == path).map(|_| item))
    })
}
