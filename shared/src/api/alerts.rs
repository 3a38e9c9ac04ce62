use serde::Serialize;
use serde_json::Value;

use super::AdminApi;
use crate::client::Transport;
use crate::error::ApiResult;
use crate::protocol::{ApiCall, ContainerRef, MonthRequest, ServerRef, segment};

impl<T: Transport> AdminApi<T> {
    pub async fn get_alerts(&self) -> ApiResult<Vec<Value>> {
        self.list(ApiCall::get("/alerts"), "alerts", "api.get_alerts")
            .await
    }

    pub async fn add_alert<B: Serialize + ?Sized>(&self, alert: &B) -> ApiResult<Value> {
        let call = ApiCall::post("/alerts/add").with_json(alert)?;
        self.call(call, "api.add_alert").await
    }

    /// `month` 格式为 `YYYY-MM`
    pub async fn check_monthly_traffic(&self, month: &str) -> ApiResult<Value> {
        let call = ApiCall::post("/alerts/traffic").with_json(&MonthRequest {
            month: month.to_string(),
        })?;
        self.call(call, "api.check_monthly_traffic").await
    }

    pub async fn check_server_health_status(&self, server_id: i64) -> ApiResult<Value> {
        let call = ApiCall::post("/alerts/server_health").with_json(&ServerRef { server_id })?;
        self.call(call, "api.check_server_health_status").await
    }

    pub async fn check_docker_traffic(&self, container_id: &str) -> ApiResult<Value> {
        let call = ApiCall::post("/alerts/docker_traffic").with_json(&ContainerRef {
            container_id: container_id.to_string(),
        })?;
        self.call(call, "api.check_docker_traffic").await
    }

    pub async fn check_docker_container(&self, container_id: &str) -> ApiResult<Value> {
        let call = ApiCall::post("/alerts/docker_container").with_json(&ContainerRef {
            container_id: container_id.to_string(),
        })?;
        self.call(call, "api.check_docker_container").await
    }

    pub async fn delete_alert(&self, id: i64) -> ApiResult<Value> {
        let call = ApiCall::delete(format!("/alerts/delete/{}", segment(id)));
        self.call(call, "api.delete_alert").await
    }
}
