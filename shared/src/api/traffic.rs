use serde_json::Value;

use super::AdminApi;
use crate::client::Transport;
use crate::error::ApiResult;
use crate::protocol::{ApiCall, TrafficStatsRequest, segment};

impl<T: Transport> AdminApi<T> {
    pub async fn get_realtime_traffic(&self) -> ApiResult<Value> {
        self.call(ApiCall::get("/traffic/realtime"), "api.get_realtime_traffic")
            .await
    }

    pub async fn get_container_traffic(&self, container_id: &str) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/traffic/realtime/{}", segment(container_id)));
        self.call(call, "api.get_container_traffic").await
    }

    pub async fn get_traffic_history(&self, user_id: i64) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/traffic/history/{}", segment(user_id)));
        self.call(call, "api.get_traffic_history").await
    }

    pub async fn get_traffic_stats(&self, start_date: &str, end_date: &str) -> ApiResult<Value> {
        let call = ApiCall::post("/traffic/stats").with_json(&TrafficStatsRequest {
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        })?;
        self.call(call, "api.get_traffic_stats").await
    }

    pub async fn get_overlimit_users(&self) -> ApiResult<Value> {
        self.call(ApiCall::get("/traffic/overlimit"), "api.get_overlimit_users")
            .await
    }
}
