use adminone_shared::Container;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::snackbar::use_snackbar;

/// 容器行，附带从服务器目录查到的服务器名称
#[derive(Clone)]
struct ContainerRow {
    container: Container,
    server_name: Option<String>,
}

#[component]
pub fn ContainersPage() -> impl IntoView {
    let auth = use_auth();
    let snackbar = use_snackbar();

    let (rows, set_rows) = signal(Vec::<ContainerRow>::new());
    let (loading, set_loading) = signal(true);

    let load = move || {
        let api = auth.api();
        let directory = auth.directory();
        set_loading.set(true);
        spawn_local(async move {
            match api.get_containers().await {
                Ok(containers) => {
                    let mut loaded = Vec::with_capacity(containers.len());
                    for container in containers {
                        let server_name = match container.server_id {
                            Some(id) => directory
                                .fetch(&*api, id)
                                .await
                                .and_then(|s| s.server_name),
                            None => None,
                        };
                        loaded.push(ContainerRow {
                            container,
                            server_name,
                        });
                    }
                    set_rows.set(loaded);
                }
                Err(e) => snackbar.failure("加载容器失败", &e),
            }
            set_loading.set(false);
        });
    };

    let handle_stop = move |name: String| {
        let api = auth.api();
        spawn_local(async move {
            match api.stop_container(&name).await {
                Ok(_) => snackbar.success(format!("容器 {} 已停止", name)),
                Err(e) => snackbar.failure("停止容器失败", &e),
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
                                <th>"名称"</th>
                                <th>"IP"</th>
                                <th>"服务器"</th>
                                <th>"状态"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || rows.get()
                                key=|row| row.container.name.clone()
                                children=move |row| {
                                    let name = row.container.name.clone();
                                    view! {
                                        <tr>
                                            <td>{row.container.name}</td>
                                            <td>{row.container.ip.unwrap_or_else(|| "-".to_string())}</td>
                                            <td>{row.server_name.unwrap_or_else(|| "-".to_string())}</td>
                                            <td>{row.container.status.unwrap_or_else(|| "-".to_string())}</td>
                                            <td>
                                                <button class="btn btn-xs" on:click=move |_| handle_stop(name.clone())>
                                                    "停止"
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
