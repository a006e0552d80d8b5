//! 带看页
//!
//! 列表 hook 自带轮询与静默自动同步；页面上的"同步日历"按钮
//! 走手动同步路径，结果通过全局提示反馈。

use leptos::prelude::*;
use propcrm_shared::protocol::{ListViewingsRequest, SyncViewingsRequest};
use propcrm_shared::{Viewing, ViewingStatus};

use crate::hooks::viewings::{use_sync_viewings, use_viewings};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

pub fn status_label(status: ViewingStatus) -> &'static str {
    match status {
        ViewingStatus::Requested => "待确认",
        ViewingStatus::Scheduled => "已排期",
        ViewingStatus::Completed => "已完成",
        ViewingStatus::Cancelled => "已取消",
        ViewingStatus::NoShow => "爽约",
    }
}

fn status_badge(status: ViewingStatus) -> &'static str {
    match status {
        ViewingStatus::Requested => "badge badge-warning",
        ViewingStatus::Scheduled => "badge badge-info",
        ViewingStatus::Completed => "badge badge-success",
        ViewingStatus::Cancelled | ViewingStatus::NoShow => "badge badge-ghost",
    }
}

#[component]
pub fn ViewingsPage() -> impl IntoView {
    let viewings = use_viewings(ListViewingsRequest::default());
    let sync = use_sync_viewings();

    let data = viewings.data;
    let is_loading = viewings.is_loading;
    let error = viewings.error;
    let sync_pending = sync.is_pending;

    let on_sync = {
        let sync = sync.clone();
        move |_| sync.mutate(SyncViewingsRequest)
    };

    view! {
        <div>
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold">"带看预约"</h1>
                <button
                    class="btn btn-outline btn-sm"
                    disabled=move || sync_pending.get()
                    on:click=on_sync
                >
                    {move || if sync_pending.get() {
                        view! { <span class="loading loading-spinner loading-xs"></span> "同步中..." }
                            .into_any()
                    } else {
                        "同步日历".into_any()
                    }}
                </button>
            </div>

            <Show when=move || error.get().is_some()>
                <div class="alert alert-error mb-4">
                    <span>{move || error.get().unwrap_or_default()}</span>
                </div>
            </Show>
            <Show when=move || is_loading.get() && data.get().is_none()>
                <div class="flex justify-center p-8">
                    <span class="loading loading-spinner loading-lg"></span>
                </div>
            </Show>

            <div class="card bg-base-100 shadow">
                <div class="card-body p-0">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"申请人"</th>
                                <th>"房源"</th>
                                <th>"状态"</th>
                                <th>"排期时间"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || {
                                data.get()
                                    .unwrap_or_default()
                                    .into_iter()
                                    .map(|viewing| view! { <ViewingRow viewing=viewing /> })
                                    .collect_view()
                            }}
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ViewingRow(viewing: Viewing) -> impl IntoView {
    let router = use_router();
    let property_id = viewing.property_id.clone();

    view! {
        <tr>
            <td>{viewing.applicant_name.clone()}</td>
            <td>
                <a
                    class="link link-primary"
                    on:click=move |_| {
                        router.navigate_route(AppRoute::Property(property_id.clone()))
                    }
                >
                    {viewing.property_id.clone()}
                </a>
            </td>
            <td>
                <span class=status_badge(viewing.status)>{status_label(viewing.status)}</span>
            </td>
            <td>
                {viewing
                    .scheduled_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string())}
            </td>
        </tr>
    }
}
