use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod format;
pub mod guard;
pub mod menu;
pub mod protocol;
pub mod route;
pub mod session;
pub mod snackbar;
pub mod storage;

pub use api::AdminApi;
pub use client::{ApiClient, Transport};
pub use config::{ClientConfig, RetryPolicy};
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use route::AppRoute;
pub use session::{Session, SessionEvent, SessionStore};
pub use storage::{KeyValueStore, MemoryStorage};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const STORAGE_TOKEN_KEY: &str = "token";
pub const STORAGE_USER_KEY: &str = "user";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const ROLE_ADMIN: &str = "admin";

const AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 当前登录用户
///
/// 未识别的字段保存在 `extra` 中，持久化后再读取得到相等的值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }

    /// 导航栏显示名：用户名优先，其次邮箱
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }

    /// 由邮箱生成的头像地址，非字母数字的连续字符替换为 `-`
    pub fn avatar_url(&self) -> String {
        let mut seed = String::with_capacity(self.email.len());
        let mut in_run = false;
        for c in self.email.chars() {
            if c.is_ascii_alphanumeric() {
                seed.push(c);
                in_run = false;
            } else if !in_run {
                seed.push('-');
                in_run = true;
            }
        }
        format!("{}{}", AVATAR_BASE, seed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(default, alias = "ip", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerCategory {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 容器
///
/// 后端的容器名中常嵌入宿主 IP（如 `derp-10.0.0.5`），`ip` 缺失时由名称推导。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, alias = "container_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Container {
    /// 名称中第一个合法的 IPv4 地址
    pub fn ip_from_name(&self) -> Option<Ipv4Addr> {
        self.name
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .find_map(|part| part.parse::<Ipv4Addr>().ok())
    }

    /// 补全派生字段
    pub fn with_derived_ip(mut self) -> Self {
        if self.ip.is_none() {
            self.ip = self.ip_from_name().map(|ip| ip.to_string());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_round_trips_with_extra_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "email": "ops@example.com",
            "username": "ops",
            "role": "admin",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        let text = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&text).unwrap();
        assert_eq!(back, user);
        assert_eq!(back.extra.get("created_at"), Some(&json!("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn avatar_seed_collapses_separators() {
        let user = User::with_email("Ops.Team+1@example.com");
        assert_eq!(
            user.avatar_url(),
            "https://api.dicebear.com/7.x/avataaars/svg?seed=Ops-Team-1-example-com"
        );
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut user = User::with_email("ops@example.com");
        assert_eq!(user.display_name(), "ops@example.com");
        user.username = Some("ops".into());
        assert_eq!(user.display_name(), "ops");
    }

    #[test]
    fn container_ip_is_derived_from_name() {
        let container: Container =
            serde_json::from_value(json!({ "container_name": "derp_192.168.1.20_7" })).unwrap();
        let container = container.with_derived_ip();
        assert_eq!(container.ip.as_deref(), Some("192.168.1.20"));
    }

    #[test]
    fn container_keeps_explicit_ip() {
        let container: Container =
            serde_json::from_value(json!({ "name": "derp-10.0.0.1", "ip": "1.1.1.1" })).unwrap();
        assert_eq!(container.with_derived_ip().ip.as_deref(), Some("1.1.1.1"));
    }

    #[test]
    fn container_without_ip_in_name() {
        let container: Container = serde_json::from_value(json!({ "name": "web" })).unwrap();
        assert_eq!(container.ip_from_name(), None);
    }
}
