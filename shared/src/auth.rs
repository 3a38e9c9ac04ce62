//! 认证流程
//!
//! 登录与注销的唯一入口。状态只通过 [`SessionStore`](crate::SessionStore)
//! 变更，界面层通过会话监听器同步显示。

use tracing::{info, warn};

use crate::User;
use crate::api::AdminApi;
use crate::client::Transport;
use crate::error::{ApiError, ApiResult};

/// 登录并建立会话
///
/// 邮箱或密码为空时不发出请求。失败时会话保持原状，错误原样返回。
/// 后端未返回用户资料时，以登录邮箱合成一个用户。
pub async fn login<T: Transport>(api: &AdminApi<T>, email: &str, password: &str) -> ApiResult<User> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::invalid_input("email and password are required").in_op("auth.login"));
    }

    let envelope = match api.login(email, password).await {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "[Auth] Login failed.");
            return Err(e.in_op("auth.login"));
        }
    };

    let user = envelope.user_or(email);
    api.client()
        .session()
        .establish(envelope.token, user.clone())
        .map_err(|e| e.in_op("auth.login"))?;
    info!(user = %user.display_name(), "[Auth] Login succeeded.");
    Ok(user)
}

/// 注销并清除状态
///
/// 导航由路由服务监听会话变化后自动处理。
pub fn logout<T: Transport>(api: &AdminApi<T>) {
    api.client().session().logout();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use crate::error::ApiErrorKind;
    use crate::storage::{KeyValueStore, MemoryStorage};
    use crate::{ApiClient, ClientConfig, STORAGE_TOKEN_KEY, STORAGE_USER_KEY, SessionStore};
    use serde_json::json;
    use std::rc::Rc;

    fn api(storage: &MemoryStorage) -> AdminApi<MockTransport> {
        let session = Rc::new(SessionStore::restore(storage.clone()));
        AdminApi::new(ApiClient::new(
            ClientConfig::default(),
            session,
            MockTransport::new(),
        ))
    }

    fn stored_user(storage: &MemoryStorage) -> User {
        serde_json::from_str(&storage.get(STORAGE_USER_KEY).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn login_persists_token_and_user() {
        let storage = MemoryStorage::new();
        let api = api(&storage);
        api.client().transport().mock_response(
            "/api/login",
            200,
            json!({ "success": true, "token": "t-1", "user": { "id": 4, "email": "ops@example.com", "role": "admin" } }),
        );

        let user = login(&api, "ops@example.com", "pw").await.unwrap();

        assert_eq!(user.role.as_deref(), Some("admin"));
        let session = api.client().session();
        assert_eq!(session.token().as_deref(), Some("t-1"));
        assert_eq!(session.user(), Some(user.clone()));
        assert_eq!(storage.get(STORAGE_TOKEN_KEY).as_deref(), Some("t-1"));
        assert_eq!(stored_user(&storage), user);
    }

    #[tokio::test]
    async fn login_without_profile_synthesizes_user() {
        let storage = MemoryStorage::new();
        let api = api(&storage);
        api.client()
            .transport()
            .mock_response("/api/login", 200, json!({ "token": "t-2" }));

        let user = login(&api, " ops@example.com ", "pw").await.unwrap();

        assert_eq!(user.email, "ops@example.com");
        assert_eq!(stored_user(&storage).email, "ops@example.com");
        assert!(api.client().session().is_authenticated());
    }

    #[tokio::test]
    async fn flat_login_body_keeps_envelope_out_of_profile() {
        let storage = MemoryStorage::new();
        let api = api(&storage);
        api.client().transport().mock_response(
            "/api/login",
            200,
            json!({
                "success": true,
                "token": "t-secret",
                "email": "ops@example.com",
                "role": "admin",
                "message": "Login successful"
            }),
        );

        let user = login(&api, "ops@example.com", "pw").await.unwrap();

        assert_eq!(user.role.as_deref(), Some("admin"));
        for key in ["token", "message", "success"] {
            assert!(!user.extra.contains_key(key), "{} kept in profile", key);
        }
        let raw = storage.get(STORAGE_USER_KEY).unwrap();
        assert!(!raw.contains("t-secret"));
        assert_eq!(stored_user(&storage), user);
        assert_eq!(storage.get(STORAGE_TOKEN_KEY).as_deref(), Some("t-secret"));
    }

    #[tokio::test]
    async fn failed_login_changes_nothing() {
        let storage = MemoryStorage::new();
        let api = api(&storage);
        api.client().transport().mock_response(
            "/api/login",
            401,
            json!({ "message": "Invalid credentials" }),
        );

        let err = login(&api, "ops@example.com", "wrong").await.unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Unauthorized);
        assert!(!api.client().session().is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn rejected_login_is_an_error() {
        let storage = MemoryStorage::new();
        let api = api(&storage);
        api.client().transport().mock_response(
            "/api/login",
            200,
            json!({ "success": false, "message": "Account disabled" }),
        );

        let err = login(&api, "ops@example.com", "pw").await.unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Rejected);
        assert_eq!(err.message(), "Account disabled");
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn empty_fields_send_nothing() {
        let storage = MemoryStorage::new();
        let api = api(&storage);

        let err = login(&api, "", "pw").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidInput);
        let err = login(&api, "ops@example.com", "").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidInput);

        assert_eq!(api.client().transport().request_count(), 0);
    }

    #[tokio::test]
    async fn storage_failure_fails_the_login() {
        let storage = MemoryStorage::new();
        let api = api(&storage);
        api.client()
            .transport()
            .mock_response("/api/login", 200, json!({ "token": "t-3" }));
        storage.fail_writes(true);

        let err = login(&api, "ops@example.com", "pw").await.unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Storage);
        assert!(!api.client().session().is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let storage = MemoryStorage::new();
        let api = api(&storage);
        api.client()
            .transport()
            .mock_response("/api/login", 200, json!({ "token": "t-4" }));
        login(&api, "ops@example.com", "pw").await.unwrap();

        logout(&api);

        assert_eq!(api.client().session().token(), None);
        assert!(storage.get(STORAGE_TOKEN_KEY).is_none());
        assert!(storage.get(STORAGE_USER_KEY).is_none());
    }
}
