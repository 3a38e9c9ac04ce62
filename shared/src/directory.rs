//! 服务器目录缓存
//!
//! 按 id 记住 `get_server` 的结果，列表页渲染服务器名称时不重复请求。

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::warn;

use crate::Server;
use crate::api::AdminApi;
use crate::client::Transport;

#[derive(Default)]
pub struct ServerDirectory {
    servers: RefCell<HashMap<i64, Server>>,
}

impl ServerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已缓存的服务器
    pub fn cached(&self, id: i64) -> Option<Server> {
        self.servers.borrow().get(&id).cloned()
    }

    /// 查询服务器，未命中时请求一次
    ///
    /// 只缓存成功的结果；失败记录日志并返回 `None`，下次调用会重试。
    pub async fn fetch<T: Transport>(&self, api: &AdminApi<T>, id: i64) -> Option<Server> {
        if let Some(server) = self.cached(id) {
            return Some(server);
        }

        match api.get_server(id).await {
            Ok(server) => {
                self.servers.borrow_mut().insert(id, server.clone());
                Some(server)
            }
            Err(e) => {
                warn!(server_id = id, error = %e, "[Directory] Server lookup failed.");
                None
            }
        }
    }

    /// 预先填入列表接口已返回的服务器
    pub fn prime(&self, servers: impl IntoIterator<Item = Server>) {
        let mut cache = self.servers.borrow_mut();
        for server in servers {
            cache.insert(server.id, server);
        }
    }

    pub fn clear(&self) {
        self.servers.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.servers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use crate::{ApiClient, ClientConfig, MemoryStorage, SessionStore};
    use serde_json::json;
    use std::rc::Rc;

    fn api() -> AdminApi<MockTransport> {
        let session = Rc::new(SessionStore::restore(MemoryStorage::new()));
        AdminApi::new(ApiClient::new(
            ClientConfig::default(),
            session,
            MockTransport::new(),
        ))
    }

    #[tokio::test]
    async fn hits_are_served_from_cache() {
        let api = api();
        api.client().transport().mock_response(
            "/api/server/7",
            200,
            json!({ "success": true, "server": { "id": 7, "server_name": "edge-7" } }),
        );
        let directory = ServerDirectory::new();

        let first = directory.fetch(&api, 7).await.unwrap();
        let second = directory.fetch(&api, 7).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.server_name.as_deref(), Some("edge-7"));
        assert_eq!(api.client().transport().request_count(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let api = api();
        api.client()
            .transport()
            .mock_response("/api/server/9", 500, json!({ "error": "boom" }));
        api.client()
            .transport()
            .mock_response("/api/server/9", 200, json!({ "id": 9 }));
        let directory = ServerDirectory::new();

        assert_eq!(directory.fetch(&api, 9).await, None);
        assert!(directory.is_empty());
        assert_eq!(directory.fetch(&api, 9).await.map(|s| s.id), Some(9));
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn primed_entries_skip_the_network() {
        let api = api();
        let directory = ServerDirectory::new();
        let server: Server = serde_json::from_value(json!({ "id": 3, "region": "hk" })).unwrap();

        directory.prime([server.clone()]);

        assert_eq!(directory.fetch(&api, 3).await, Some(server));
        assert_eq!(api.client().transport().request_count(), 0);
        directory.clear();
        assert_eq!(directory.cached(3), None);
    }
}
