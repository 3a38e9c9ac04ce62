use serde_json::Value;

use super::AdminApi;
use crate::client::Transport;
use crate::error::ApiResult;
use crate::protocol::{ApiCall, segment};

impl<T: Transport> AdminApi<T> {
    pub async fn get_ha_health(&self) -> ApiResult<Value> {
        self.call(ApiCall::get("/ha/health"), "api.get_ha_health").await
    }

    pub async fn get_server_health(&self, server_id: i64) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/ha/health/{}", segment(server_id)));
        self.call(call, "api.get_server_health").await
    }

    pub async fn get_ha_container_traffic(&self, container_id: &str) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/ha/container_traffic/{}", segment(container_id)));
        self.call(call, "api.get_ha_container_traffic").await
    }

    pub async fn start_failover(&self) -> ApiResult<Value> {
        self.call(ApiCall::post("/ha/failover"), "api.start_failover").await
    }

    pub async fn start_load_balance(&self) -> ApiResult<Value> {
        self.call(ApiCall::post("/ha/load_balance"), "api.start_load_balance")
            .await
    }

    pub async fn start_disaster_recovery(&self) -> ApiResult<Value> {
        self.call(ApiCall::post("/ha/disaster_recovery"), "api.start_disaster_recovery")
            .await
    }

    pub async fn replace_container(&self) -> ApiResult<Value> {
        self.call(ApiCall::post("/ha/replace_container"), "api.replace_container")
            .await
    }
}
