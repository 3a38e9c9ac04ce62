use serde_json::Value;

use super::AdminApi;
use crate::client::Transport;
use crate::error::ApiResult;
use crate::protocol::{ApiCall, ServerPayload, item_from, segment};
use crate::{Server, ServerCategory};

impl<T: Transport> AdminApi<T> {
    pub async fn get_servers(&self) -> ApiResult<Vec<Server>> {
        self.list(ApiCall::get("/get_servers"), "servers", "api.get_servers")
            .await
    }

    pub async fn get_server_categories(&self) -> ApiResult<Vec<ServerCategory>> {
        self.list(
            ApiCall::get("/server/categories"),
            "categories",
            "api.get_server_categories",
        )
        .await
    }

    pub async fn add_server(&self, server: &ServerPayload) -> ApiResult<Value> {
        tracing::debug!(server_name = %server.server_name, ip = %server.ip_address, "[Api] Adding server.");
        let call = ApiCall::post("/add_server").with_json(server)?;
        self.call(call, "api.add_server").await
    }

    pub async fn update_server(&self, server_id: i64, server: &ServerPayload) -> ApiResult<Value> {
        tracing::debug!(server_id, "[Api] Updating server.");
        let call = ApiCall::put(format!("/update_server/{}", segment(server_id))).with_json(server)?;
        self.call(call, "api.update_server").await
    }

    pub async fn delete_server(&self, server_id: i64) -> ApiResult<Value> {
        let call = ApiCall::delete(format!("/delete_server/{}", segment(server_id)));
        self.call(call, "api.delete_server").await
    }

    pub async fn get_server_health_check(&self) -> ApiResult<Value> {
        self.call(ApiCall::get("/server/health_check"), "api.get_server_health_check")
            .await
    }

    /// `GET /server/{id}`，实体位于 `server` 键下
    pub async fn get_server(&self, server_id: i64) -> ApiResult<Server> {
        let call = ApiCall::get(format!("/server/{}", segment(server_id)));
        let payload = self.call(call, "api.get_server").await?;
        item_from(payload, "server").map_err(|e| e.in_op("api.get_server"))
    }
}
