//! 控制面板
//!
//! 汇总各资源的统计卡片，并承载"是否要求认证"的运行时开关。

use leptos::prelude::*;
use propcrm_shared::protocol::{ListTasksRequest, ListViewingsRequest};
use propcrm_shared::TaskStatus;

use crate::hooks::calls::use_ai_calls;
use crate::hooks::tasks::use_tasks;
use crate::hooks::viewings::use_viewings;
use crate::settings::{set_auth_required, use_settings};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let settings = use_settings();

    let tasks = use_tasks(ListTasksRequest::default());
    let viewings = use_viewings(ListViewingsRequest::default());
    let calls = use_ai_calls();

    let open_tasks = {
        let data = tasks.data;
        move || {
            data.get()
                .map(|list| {
                    list.iter()
                        .filter(|t| matches!(t.status, TaskStatus::Open | TaskStatus::InProgress))
                        .count()
                })
                .unwrap_or(0)
        }
    };

    let pending_viewings = {
        let data = viewings.data;
        move || {
            data.get()
                .map(|list| list.iter().filter(|v| v.status.is_transient()).count())
                .unwrap_or(0)
        }
    };

    let active_calls = {
        let data = calls.data;
        move || {
            data.get()
                .map(|list| list.iter().filter(|c| c.status.is_transient()).count())
                .unwrap_or(0)
        }
    };

    let on_toggle_auth = move |_| {
        // 写入存储并广播；守卫订阅设置信号后从 Loading 重新计算
        set_auth_required(!settings.auth_required.get_untracked());
    };

    view! {
        <div>
            <h1 class="text-2xl font-bold mb-6">"控制面板"</h1>

            <div class="stats shadow w-full mb-6">
                <div class="stat">
                    <div class="stat-title">"待办任务"</div>
                    <div class="stat-value text-primary">{open_tasks}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"待确认带看"</div>
                    <div class="stat-value text-secondary">{pending_viewings}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"进行中外呼"</div>
                    <div class="stat-value text-accent">{active_calls}</div>
                </div>
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title text-base">"访问设置"</h2>
                    <label class="label cursor-pointer justify-start gap-4">
                        <input
                            type="checkbox"
                            class="toggle toggle-primary"
                            prop:checked=move || settings.auth_required.get()
                            on:change=on_toggle_auth
                        />
                        <span class="label-text">
                            "要求登录后访问（关闭后所有页面免认证开放）"
                        </span>
                    </label>
                </div>
            </div>
        </div>
    }
}
