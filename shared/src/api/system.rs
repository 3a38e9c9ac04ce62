//! 日志、通知、监控与接口索引

use serde::Serialize;
use serde_json::Value;

use super::AdminApi;
use crate::client::Transport;
use crate::error::ApiResult;
use crate::protocol::{ApiCall, segment};

impl<T: Transport> AdminApi<T> {
    pub async fn get_system_logs(&self) -> ApiResult<Value> {
        self.call(ApiCall::get("/logs/system"), "api.get_system_logs").await
    }

    pub async fn get_user_logs_by_time(&self) -> ApiResult<Value> {
        self.call(ApiCall::get("/logs/user_by_time"), "api.get_user_logs_by_time")
            .await
    }

    pub async fn update_log<B: Serialize + ?Sized>(&self, id: i64, data: &B) -> ApiResult<Value> {
        let call = ApiCall::put(format!("/logs/update/{}", segment(id))).with_json(data)?;
        self.call(call, "api.update_log").await
    }

    pub async fn delete_log(&self, id: i64) -> ApiResult<Value> {
        let call = ApiCall::delete(format!("/logs/delete/{}", segment(id)));
        self.call(call, "api.delete_log").await
    }

    pub async fn send_reminder_notification<B: Serialize + ?Sized>(&self, data: &B) -> ApiResult<Value> {
        let call = ApiCall::post("/notifications/send_reminder").with_json(data)?;
        self.call(call, "api.send_reminder_notification").await
    }

    pub async fn get_notifications(&self) -> ApiResult<Vec<Value>> {
        self.list(ApiCall::get("/notifications"), "notifications", "api.get_notifications")
            .await
    }

    pub async fn mark_notification_as_read(&self, notification_id: i64) -> ApiResult<Value> {
        let call = ApiCall::put(format!("/notifications/{}/read", segment(notification_id)));
        self.call(call, "api.mark_notification_as_read").await
    }

    pub async fn get_monitoring_status(&self) -> ApiResult<Value> {
        self.call(ApiCall::get("/monitoring"), "api.get_monitoring_status")
            .await
    }

    pub async fn get_api_urls(&self) -> ApiResult<Value> {
        self.call(ApiCall::get("/api/urls"), "api.get_api_urls").await
    }
}
