//! 应用外壳：顶部导航 + 通知下拉 + 内容区
//!
//! 所有受保护页面共用。通知铃铛挂的是轮询 hook，存在未读时
//! 每 15 秒刷新一次，全部已读后自动停止。

use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::hooks::notifications::{use_mark_notification_read, use_notifications};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use propcrm_shared::protocol::MarkNotificationReadRequest;

/// 导航项定义
const NAV_ITEMS: &[(&str, AppRoute)] = &[
    ("面板", AppRoute::Dashboard),
    ("任务", AppRoute::Tasks),
    ("带看", AppRoute::Viewings),
    ("外呼", AppRoute::Calls),
    ("成员", AppRoute::Users),
];

#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let notifications = use_notifications();
    let mark_read = use_mark_notification_read();

    let unread_count = {
        let data = notifications.data;
        move || {
            data.get()
                .map(|list| list.iter().filter(|n| !n.read).count())
                .unwrap_or(0)
        }
    };

    let user_name = move || {
        auth.state
            .get()
            .user
            .map(|u| u.name)
            .unwrap_or_else(|| "未登录".to_string())
    };

    let on_logout = move |_| {
        logout(&auth);
        // 导航由守卫在下一次求值时发出
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 shadow">
                <div class="flex-1">
                    <a
                        class="btn btn-ghost text-xl"
                        on:click=move |_| router.navigate_route(AppRoute::Dashboard)
                    >
                        "PropCRM"
                    </a>
                    <ul class="menu menu-horizontal px-1">
                        {NAV_ITEMS
                            .iter()
                            .map(|(label, route)| {
                                let route = route.clone();
                                let active_route = route.clone();
                                view! {
                                    <li>
                                        <a
                                            class=move || {
                                                if router.current_route().get() == active_route {
                                                    "active"
                                                } else {
                                                    ""
                                                }
                                            }
                                            on:click=move |_| router.navigate_route(route.clone())
                                        >
                                            {*label}
                                        </a>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </div>
                <div class="flex-none gap-2">
                    <div class="dropdown dropdown-end">
                        <div tabindex="0" role="button" class="btn btn-ghost btn-circle">
                            <div class="indicator">
                                <span>"🔔"</span>
                                <Show when=move || { unread_count() > 0 }>
                                    <span class="badge badge-sm badge-error indicator-item">
                                        {unread_count}
                                    </span>
                                </Show>
                            </div>
                        </div>
                        <ul
                            tabindex="0"
                            class="dropdown-content menu bg-base-100 rounded-box z-10 w-80 p-2 shadow"
                        >
                            {
                                let data = notifications.data;
                                let mark_read = mark_read.clone();
                                move || {
                                    let items = data.get().unwrap_or_default();
                                    if items.is_empty() {
                                        view! { <li class="p-2 text-sm opacity-60">"暂无通知"</li> }
                                            .into_any()
                                    } else {
                                        items
                                            .into_iter()
                                            .map(|n| {
                                                let mark_read = mark_read.clone();
                                                let id = n.id.clone();
                                                let class = if n.read { "opacity-60" } else { "font-semibold" };
                                                view! {
                                                    <li>
                                                        <a
                                                            class=class
                                                            on:click=move |_| {
                                                                mark_read
                                                                    .mutate(MarkNotificationReadRequest {
                                                                        id: id.clone(),
                                                                    })
                                                            }
                                                        >
                                                            {n.message}
                                                        </a>
                                                    </li>
                                                }
                                            })
                                            .collect_view()
                                            .into_any()
                                    }
                                }
                            }
                        </ul>
                    </div>
                    <span class="text-sm opacity-70">{user_name}</span>
                    <button class="btn btn-ghost btn-sm" on:click=on_logout>
                        "退出"
                    </button>
                </div>
            </div>
            <main class="p-6 max-w-6xl mx-auto">{children()}</main>
        </div>
    }
}
