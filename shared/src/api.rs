//! 业务 API：每个后端接口对应一个方法
//!
//! 方法按资源分布在各子模块中，各自构造一个 [`ApiCall`] 并交给 [`ApiClient`]。
//! 响应先经客户端信封归一化，列表和嵌套实体再在这里整形。

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{ApiClient, Transport};
use crate::error::ApiResult;
use crate::protocol::{ApiCall, list_from};

mod acl;
mod alerts;
mod containers;
mod ha;
mod rental;
mod serials;
mod servers;
mod system;
mod traffic;
mod users;

pub struct AdminApi<T> {
    client: ApiClient<T>,
}

impl<T: Transport> AdminApi<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    /// 发送请求并返回归一化负载
    async fn call(&self, call: ApiCall, op: &'static str) -> ApiResult<Value> {
        self.client.fetch(call).await.map_err(|e| e.in_op(op))
    }

    /// 发送请求并取出 `entity_key` 下的列表
    async fn list<R: DeserializeOwned>(
        &self,
        call: ApiCall,
        entity_key: &str,
        op: &'static str,
    ) -> ApiResult<Vec<R>> {
        let payload = self.call(call, op).await?;
        list_from(payload, entity_key).map_err(|e| e.in_op(op))
    }
}

#[cfg(test)]
mod tests;
