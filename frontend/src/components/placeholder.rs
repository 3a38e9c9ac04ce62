use adminone_shared::AppRoute;
use leptos::prelude::*;

use crate::web::router::Link;

/// 尚未实现独立视图的页面
#[component]
pub fn PlaceholderPage(route: AppRoute) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <p class="text-base-content/70">{format!("{} 页面正在建设中", route.effective_meta().title)}</p>
            </div>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"页面未找到"</p>
                <Link to=AppRoute::auth_success_redirect().to_path() class="btn btn-link mt-4">
                    "返回首页"
                </Link>
            </div>
        </div>
    }
}

#[component]
pub fn ErrorPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-4xl font-bold text-error">"出错了"</h1>
                <p class="text-xl mt-4">"请求未能完成，请稍后重试"</p>
                <Link to=AppRoute::auth_success_redirect().to_path() class="btn btn-link mt-4">
                    "返回首页"
                </Link>
            </div>
        </div>
    }
}
