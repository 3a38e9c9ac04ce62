use serde::Serialize;
use serde_json::Value;

use super::AdminApi;
use crate::User;
use crate::client::Transport;
use crate::error::ApiResult;
use crate::protocol::{
    ApiCall, ApplyDistributorRequest, EmailRequest, LOGIN_PATH, LoginEnvelope, LoginRequest,
    segment,
};

impl<T: Transport> AdminApi<T> {
    /// `POST /login`，归一化为 [`LoginEnvelope`]
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginEnvelope> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let call = ApiCall::post(LOGIN_PATH).with_json(&body)?;
        self.client.fetch_login(call).await.map_err(|e| e.in_op("api.login"))
    }

    pub async fn add_user<B: Serialize + ?Sized>(&self, user: &B) -> ApiResult<Value> {
        let call = ApiCall::post("/add_user").with_json(user)?;
        self.call(call, "api.add_user").await
    }

    pub async fn send_verification_email(&self, email: &str) -> ApiResult<Value> {
        let call = ApiCall::post("/send_verification_email").with_json(&EmailRequest {
            email: email.to_string(),
        })?;
        self.call(call, "api.send_verification_email").await
    }

    pub async fn get_rental_info(&self) -> ApiResult<Value> {
        self.call(ApiCall::get("/user/rental_info"), "api.get_rental_info")
            .await
    }

    pub async fn get_user_history(&self, user_id: i64) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/user/history/{}", segment(user_id)));
        self.call(call, "api.get_user_history").await
    }

    pub async fn apply_distributor(&self, user_id: i64, distributor_code: &str) -> ApiResult<Value> {
        let call = ApiCall::post("/user/apply_distributor").with_json(&ApplyDistributorRequest {
            user_id,
            distributor_code: distributor_code.to_string(),
        })?;
        self.call(call, "api.apply_distributor").await
    }

    /// 当前登录用户自己的 ACL 文件
    pub async fn download_own_acl(&self) -> ApiResult<Value> {
        self.call(ApiCall::get("/user/download_acl"), "api.download_own_acl")
            .await
    }

    pub async fn get_all_users(&self) -> ApiResult<Vec<User>> {
        self.list(ApiCall::get("/users"), "users", "api.get_all_users")
            .await
    }

    pub async fn get_user(&self, user_id: i64) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/user/{}", segment(user_id)));
        self.call(call, "api.get_user").await
    }

    pub async fn get_user_acl_info(&self, user_id: i64) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/user/acl_info/{}", segment(user_id)));
        self.call(call, "api.get_user_acl_info").await
    }
}
