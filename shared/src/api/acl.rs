use serde_json::Value;

use super::AdminApi;
use crate::client::Transport;
use crate::error::ApiResult;
use crate::protocol::{ApiCall, GenerateAclRequest, segment};

impl<T: Transport> AdminApi<T> {
    pub async fn generate_acl(&self, req: &GenerateAclRequest) -> ApiResult<Value> {
        tracing::debug!(user_id = req.user_id, server_id = req.server_id, "[Api] Generating ACL.");
        let call = ApiCall::post("/acl/generate").with_json(req)?;
        self.call(call, "api.generate_acl").await
    }

    pub async fn get_acl_logs(&self, user_id: i64) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/acl/logs/{}", segment(user_id)));
        self.call(call, "api.get_acl_logs").await
    }

    pub async fn download_acl(&self, username: &str) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/acl/download/{}", segment(username)));
        self.call(call, "api.download_acl").await
    }

    pub async fn get_acl_list(&self) -> ApiResult<Vec<Value>> {
        self.list(ApiCall::get("/acl/list"), "acls", "api.get_acl_list")
            .await
    }

    pub async fn get_acl_configs(&self) -> ApiResult<Vec<Value>> {
        self.list(ApiCall::get("/acl/configs"), "configs", "api.get_acl_configs")
            .await
    }
}
