use serde::Serialize;
use serde_json::Value;

use super::AdminApi;
use crate::Container;
use crate::client::Transport;
use crate::error::ApiResult;
use crate::protocol::{ApiCall, segment};

impl<T: Transport> AdminApi<T> {
    /// 全部容器；缺少 `ip` 时由名称推导
    pub async fn get_containers(&self) -> ApiResult<Vec<Container>> {
        let containers: Vec<Container> = self
            .list(ApiCall::get("/containers"), "containers", "api.get_containers")
            .await?;
        Ok(containers.into_iter().map(Container::with_derived_ip).collect())
    }

    pub async fn get_server_containers(&self, server_id: i64) -> ApiResult<Vec<Container>> {
        let call = ApiCall::get("/containers").with_query("server_id", server_id);
        let containers: Vec<Container> = self
            .list(call, "containers", "api.get_server_containers")
            .await?;
        Ok(containers.into_iter().map(Container::with_derived_ip).collect())
    }

    pub async fn create_container<B: Serialize + ?Sized>(&self, data: &B) -> ApiResult<Value> {
        let call = ApiCall::post("/containers").with_json(data)?;
        self.call(call, "api.create_container").await
    }

    pub async fn get_container_status(&self, container_name: &str) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/containers/{}/status", segment(container_name)));
        self.call(call, "api.get_container_status").await
    }

    pub async fn stop_container(&self, container_name: &str) -> ApiResult<Value> {
        let call = ApiCall::post(format!("/containers/{}/stop", segment(container_name)));
        self.call(call, "api.stop_container").await
    }

    pub async fn update_container<B: Serialize + ?Sized>(
        &self,
        container_name: &str,
        data: &B,
    ) -> ApiResult<Value> {
        let call =
            ApiCall::put(format!("/containers/{}", segment(container_name))).with_json(data)?;
        self.call(call, "api.update_container").await
    }

    pub async fn get_container(&self, container_id: &str) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/container/{}", segment(container_id)));
        self.call(call, "api.get_container").await
    }
}
