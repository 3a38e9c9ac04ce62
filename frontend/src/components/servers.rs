use adminone_shared::Server;
use adminone_shared::format::format_date;
use serde_json::Value;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::snackbar::use_snackbar;

/// 创建时间列
fn created_at(server: &Server) -> String {
    server
        .extra
        .get("created_at")
        .and_then(Value::as_str)
        .map(|value| format_date(value, true))
        .unwrap_or_else(|| "-".to_string())
}

#[component]
pub fn ServersPage() -> impl IntoView {
    let auth = use_auth();
    let snackbar = use_snackbar();

    let (servers, set_servers) = signal(Vec::<Server>::new());
    let (loading, set_loading) = signal(true);

    let load = move || {
        let api = auth.api();
        let directory = auth.directory();
        set_loading.set(true);
        spawn_local(async move {
            match api.get_servers().await {
                Ok(list) => {
                    directory.prime(list.iter().cloned());
                    set_servers.set(list);
                }
                Err(e) => snackbar.failure("加载服务器失败", &e),
            }
            set_loading.set(false);
        });
    };

    let handle_delete = move |id: i64| {
        let api = auth.api();
        spawn_local(async move {
            match api.delete_server(id).await {
                Ok(_) => {
                    snackbar.success("服务器已删除");
                    set_servers.update(|list| list.retain(|s| s.id != id));
                }
                Err(e) => snackbar.failure("删除服务器失败", &e),
            }
        });
    };

    load();

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body overflow-x-auto">
                <Show
                    when=move || !loading.get()
                    fallback=|| view! { <span class="loading loading-spinner loading-lg text-primary"></span> }
                >
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"名称"</th>
                                <th>"IP"</th>
                                <th>"地区"</th>
                                <th>"创建时间"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || servers.get()
                                key=|server| server.id
                                children=move |server| {
                                    let id = server.id;
                                    let created = created_at(&server);
                                    view! {
                                        <tr>
                                            <td>{id}</td>
                                            <td>{server.server_name.unwrap_or_else(|| "-".to_string())}</td>
                                            <td>{server.ip_address.unwrap_or_else(|| "-".to_string())}</td>
                                            <td>{server.region.unwrap_or_else(|| "-".to_string())}</td>
                                            <td>{created}</td>
                                            <td>
                                                <button class="btn btn-xs btn-error" on:click=move |_| handle_delete(id)>
                                                    "删除"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </Show>
            </div>
        </div>
    }
}
