use serde::Serialize;
use serde_json::Value;

use super::AdminApi;
use crate::client::Transport;
use crate::error::ApiResult;
use crate::protocol::{ApiCall, ExpiryNoticeRequest, RenewRentalRequest, segment};

impl<T: Transport> AdminApi<T> {
    pub async fn check_rental_expiry(&self) -> ApiResult<Value> {
        self.call(ApiCall::get("/rental/check_expiry"), "api.check_rental_expiry")
            .await
    }

    pub async fn send_expiry_notifications(&self, user_id: i64, expiry_date: &str) -> ApiResult<Value> {
        let call = ApiCall::post("/rental/send_expiry_notifications").with_json(&ExpiryNoticeRequest {
            user_id,
            expiry_date: expiry_date.to_string(),
        })?;
        self.call(call, "api.send_expiry_notifications").await
    }

    pub async fn renew_rental(&self, rental_id: i64, new_expiry_date: &str) -> ApiResult<Value> {
        let call = ApiCall::post("/rental/renew").with_json(&RenewRentalRequest {
            rental_id,
            new_expiry_date: new_expiry_date.to_string(),
        })?;
        self.call(call, "api.renew_rental").await
    }

    pub async fn delete_rental(&self, serial_id: i64) -> ApiResult<Value> {
        let call = ApiCall::delete(format!("/rental/delete/{}", segment(serial_id)));
        self.call(call, "api.delete_rental").await
    }

    pub async fn get_rental_history(&self, user_id: i64) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/rental/history/{}", segment(user_id)));
        self.call(call, "api.get_rental_history").await
    }

    pub async fn update_rental_history<B: Serialize + ?Sized>(&self, id: i64, data: &B) -> ApiResult<Value> {
        let call = ApiCall::put(format!("/rental/history/update/{}", segment(id))).with_json(data)?;
        self.call(call, "api.update_rental_history").await
    }

    pub async fn delete_rental_history(&self, id: i64) -> ApiResult<Value> {
        let call = ApiCall::delete(format!("/rental/history/delete/{}", segment(id)));
        self.call(call, "api.delete_rental_history").await
    }
}
