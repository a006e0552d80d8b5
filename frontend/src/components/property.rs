//! 房源详情页
//!
//! 按房源 id 过滤的带看与任务。过滤后的列表与全量列表是不同的
//! 缓存 key，却同属各自的资源族，族失效时一并刷新。

use leptos::prelude::*;
use propcrm_shared::protocol::{ListTasksRequest, ListViewingsRequest};

use crate::components::viewings::status_label;
use crate::hooks::tasks::use_tasks;
use crate::hooks::viewings::use_viewings;

#[component]
pub fn PropertyPage(id: String) -> impl IntoView {
    let viewings = use_viewings(ListViewingsRequest {
        status: None,
        property_id: Some(id.clone()),
    });
    // 任务按 assignee 过滤在任务页；这里取全量后按房源筛
    let tasks = use_tasks(ListTasksRequest::default());

    let viewings_data = viewings.data;
    let viewings_loading = viewings.is_loading;
    let tasks_data = tasks.data;
    let property_id = id.clone();

    let property_tasks = move || {
        let property_id = property_id.clone();
        tasks_data
            .get()
            .unwrap_or_default()
            .into_iter()
            .filter(|t| t.property_id.as_deref() == Some(property_id.as_str()))
            .collect::<Vec<_>>()
    };

    view! {
        <div>
            <h1 class="text-2xl font-bold mb-6">{format!("房源 {}", id)}</h1>

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title text-base">"带看记录"</h2>
                        <Show when=move || {
                            viewings_loading.get() && viewings_data.get().is_none()
                        }>
                            <span class="loading loading-spinner"></span>
                        </Show>
                        <ul class="divide-y divide-base-200">
                            {move || {
                                let items = viewings_data.get().unwrap_or_default();
                                if items.is_empty() {
                                    view! { <li class="py-2 text-sm opacity-60">"暂无带看"</li> }
                                        .into_any()
                                } else {
                                    items
                                        .into_iter()
                                        .map(|v| {
                                            view! {
                                                <li class="py-2 flex justify-between text-sm">
                                                    <span>{v.applicant_name}</span>
                                                    <span class="opacity-70">
                                                        {status_label(v.status)}
                                                    </span>
                                                </li>
                                            }
                                        })
                                        .collect_view()
                                        .into_any()
                                }
                            }}
                        </ul>
                    </div>
                </div>

                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title text-base">"关联任务"</h2>
                        <ul class="divide-y divide-base-200">
                            {move || {
                                let items = property_tasks();
                                if items.is_empty() {
                                    view! { <li class="py-2 text-sm opacity-60">"暂无任务"</li> }
                                        .into_any()
                                } else {
                                    items
                                        .into_iter()
                                        .map(|t| {
                                            view! {
                                                <li class="py-2 flex justify-between text-sm">
                                                    <span>{t.title}</span>
                                                    <span class="badge badge-outline">
                                                        {t.status.as_str()}
                                                    </span>
                                                </li>
                                            }
                                        })
                                        .collect_view()
                                        .into_any()
                                }
                            }}
                        </ul>
                    </div>
                </div>
            </div>
        </div>
    }
}
