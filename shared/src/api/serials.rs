use serde::Serialize;
use serde_json::Value;

use super::AdminApi;
use crate::client::Transport;
use crate::error::{ApiError, ApiResult};
use crate::protocol::{ApiCall, DeleteSerialsRequest, GenerateSerialsRequest, segment};

impl<T: Transport> AdminApi<T> {
    pub async fn get_serials(&self) -> ApiResult<Vec<Value>> {
        self.list(ApiCall::get("/serials"), "serial_numbers", "api.get_serials")
            .await
    }

    pub async fn get_serial_list(&self) -> ApiResult<Vec<Value>> {
        self.list(ApiCall::get("/serial/list"), "serial_numbers", "api.get_serial_list")
            .await
    }

    pub async fn check_serial(&self, serial_code: &str) -> ApiResult<Value> {
        let call = ApiCall::get(format!("/serial/check/{}", segment(serial_code)));
        self.call(call, "api.check_serial").await
    }

    pub async fn generate_serials(&self, req: &GenerateSerialsRequest) -> ApiResult<Value> {
        if req.count == 0 {
            return Err(ApiError::invalid_input("count must be positive").in_op("api.generate_serials"));
        }
        let call = ApiCall::post("/serial/generate").with_json(req)?;
        self.call(call, "api.generate_serials").await
    }

    pub async fn update_serial<B: Serialize + ?Sized>(&self, id: i64, data: &B) -> ApiResult<Value> {
        let call = ApiCall::put(format!("/serial/update/{}", segment(id))).with_json(data)?;
        self.call(call, "api.update_serial").await
    }

    /// `DELETE /serial/delete`，序列号放在请求体中
    pub async fn delete_serials(&self, req: &DeleteSerialsRequest) -> ApiResult<Value> {
        let call = ApiCall::delete("/serial/delete").with_json(req)?;
        self.call(call, "api.delete_serials").await
    }

    pub async fn batch_delete_serials(&self, codes: &[String]) -> ApiResult<Value> {
        if codes.is_empty() {
            return Err(ApiError::invalid_input("no serial codes selected").in_op("api.batch_delete_serials"));
        }
        self.delete_serials(&DeleteSerialsRequest {
            serial_codes: codes.to_vec(),
        })
        .await
    }
}
