//! 已认证页面的外框：侧边栏、顶部导航栏和标题

use adminone_shared::AppRoute;
use adminone_shared::menu::{ASIDE_MENU, MenuItem, MenuKind, NAVBAR_MENU, find_active};
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::web::router::{Link, use_router};

#[component]
fn AsideItem(item: &'static MenuItem) -> impl IntoView {
    let router = use_router();
    let is_active = move || {
        let path = router.current_route().get().to_path();
        find_active(ASIDE_MENU, path).is_some_and(|active| std::ptr::eq(active, item))
    };

    match item.to {
        Some(to) => view! {
            <li>
                <Link to=to class="">
                    <span class:font-bold=is_active>{item.label}</span>
                </Link>
            </li>
        }
        .into_any(),
        None => {
            let expanded = move || item.contains_path(router.current_route().get().to_path());
            view! {
                <li>
                    <details open=expanded>
                        <summary>{item.label}</summary>
                        <ul>
                            {item.menu.iter().map(|child| view! { <AsideItem item=child /> }).collect_view()}
                        </ul>
                    </details>
                </li>
            }
            .into_any()
        }
    }
}

#[component]
fn NavBar() -> impl IntoView {
    let auth = use_auth();
    let user = auth.user_signal();

    let render_item = move |item: &'static MenuItem| match item.kind {
        MenuKind::Divider => view! { <li class="divider"></li> }.into_any(),
        MenuKind::Logout => view! {
            <li><button on:click=move |_| auth.logout()>{item.label}</button></li>
        }
        .into_any(),
        _ => match item.to {
            Some(to) => view! { <li><Link to=to>{item.label}</Link></li> }.into_any(),
            None => view! { <li><span>{item.label}</span></li> }.into_any(),
        },
    };

    view! {
        <div class="navbar bg-base-100 shadow-sm">
            <div class="flex-1" />
            {NAVBAR_MENU
                .iter()
                .filter(|item| item.kind == MenuKind::CurrentUser)
                .map(|item| {
                    view! {
                        <div class="dropdown dropdown-end">
                            <div tabindex="0" role="button" class="btn btn-ghost gap-2">
                                {move || user.get().map(|u| view! {
                                    <img class="w-8 rounded-full" src=u.avatar_url() alt="avatar" />
                                })}
                                <span>
                                    {move || user.get().map(|u| u.display_name().to_string()).unwrap_or_else(|| item.label.to_string())}
                                </span>
                            </div>
                            <ul tabindex="0" class="menu dropdown-content bg-base-100 rounded-box w-52 shadow">
                                {item.menu.iter().map(|child| render_item(child)).collect_view()}
                            </ul>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// 需要认证的页面外框
#[component]
pub fn AuthenticatedLayout(route: AppRoute, children: Children) -> impl IntoView {
    let title = route.effective_meta().title;

    view! {
        <div class="drawer lg:drawer-open min-h-screen bg-base-200">
            <div class="drawer-content flex flex-col">
                <NavBar />
                <main class="p-4 md:p-8 space-y-6">
                    <h1 class="text-2xl font-bold">{title}</h1>
                    {children()}
                </main>
            </div>
            <aside class="drawer-side">
                <ul class="menu bg-base-100 min-h-full w-64 p-4">
                    {ASIDE_MENU.iter().map(|item| view! { <AsideItem item=item /> }).collect_view()}
                </ul>
            </aside>
        </div>
    }
}
