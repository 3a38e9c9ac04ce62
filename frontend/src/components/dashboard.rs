use adminone_shared::format::format_metric;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use crate::auth::use_auth;
use crate::components::snackbar::use_snackbar;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let snackbar = use_snackbar();

    let (metrics, set_metrics) = signal(Vec::<(String, String)>::new());
    let (server_count, set_server_count) = signal(Option::<usize>::None);
    let (loading, set_loading) = signal(true);

    let load = move || {
        let api = auth.api();
        let directory = auth.directory();
        set_loading.set(true);
        spawn_local(async move {
            match api.get_monitoring_status().await {
                Ok(Value::Object(map)) => {
                    set_metrics.set(map.iter().map(|(k, v)| (k.clone(), format_metric(k, v))).collect());
                }
                Ok(_) => set_metrics.set(Vec::new()),
                Err(e) => snackbar.failure("加载监控状态失败", &e),
            }
            match api.get_servers().await {
                Ok(servers) => {
                    set_server_count.set(Some(servers.len()));
                    directory.prime(servers);
                }
                Err(e) => snackbar.failure("加载服务器失败", &e),
            }
            set_loading.set(false);
        });
    };

    // 初始加载
    load();

    view! {
        <div class="space-y-6">
            <div class="stats shadow bg-base-100">
                <div class="stat">
                    <div class="stat-title">"服务器"</div>
                    <div class="stat-value">
                        {move || server_count.get().map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())}
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <div class="flex items-center justify-between">
                        <h2 class="card-title">"监控状态"</h2>
                        <button class="btn btn-sm" on:click=move |_| load() disabled=move || loading.get()>
                            "刷新"
                        </button>
                    </div>
                    <Show
                        when=move || !loading.get()
                        fallback=|| view! { <span class="loading loading-spinner loading-lg text-primary"></span> }
                    >
                        <table class="table">
                            <tbody>
                                {move || {
                                    metrics
                                        .get()
                                        .into_iter()
                                        .map(|(key, value)| view! { <tr><th>{key}</th><td>{value}</td></tr> })
                                        .collect_view()
                                }}
                            </tbody>
                        </table>
                    </Show>
                </div>
            </div>
        </div>
    }
}
