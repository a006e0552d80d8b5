//! 任务页
//!
//! 列表按状态过滤；不同过滤条件是不同的缓存 key，但创建/更新/删除
//! 会使整个任务族失效，所有过滤视图一起刷新。

use leptos::prelude::*;
use propcrm_shared::protocol::{
    CreateTaskRequest, DeleteTaskRequest, ListTasksRequest, UpdateTaskRequest,
};
use propcrm_shared::{Task, TaskStatus};

use crate::hooks::tasks::{use_create_task, use_delete_task, use_tasks, use_update_task};

const STATUS_FILTERS: &[(&str, Option<TaskStatus>)] = &[
    ("全部", None),
    ("待办", Some(TaskStatus::Open)),
    ("进行中", Some(TaskStatus::InProgress)),
    ("已完成", Some(TaskStatus::Done)),
];

#[component]
pub fn TasksPage() -> impl IntoView {
    let (status_filter, set_status_filter) = signal(Option::<TaskStatus>::None);

    view! {
        <div>
            <h1 class="text-2xl font-bold mb-6">"任务"</h1>

            <div class="tabs tabs-boxed mb-4">
                {STATUS_FILTERS
                    .iter()
                    .map(|(label, status)| {
                        let status = *status;
                        view! {
                            <a
                                class=move || {
                                    if status_filter.get() == status { "tab tab-active" } else { "tab" }
                                }
                                on:click=move |_| set_status_filter.set(status)
                            >
                                {*label}
                            </a>
                        }
                    })
                    .collect_view()}
            </div>

            <NewTaskForm />

            {move || {
                let filter = ListTasksRequest {
                    status: status_filter.get(),
                    assignee_id: None,
                };
                view! { <TaskList filter=filter /> }
            }}
        </div>
    }
}

#[component]
fn NewTaskForm() -> impl IntoView {
    let create = use_create_task();
    let (title, set_title) = signal(String::new());

    let on_submit = {
        let create = create.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let value = title.get_untracked();
            if value.trim().is_empty() {
                return;
            }
            create.mutate(CreateTaskRequest {
                title: value,
                description: None,
                assignee_id: None,
                property_id: None,
                due_at: None,
            });
            set_title.set(String::new());
        }
    };

    let error = create.error;
    let is_pending = create.is_pending;

    view! {
        <form class="flex gap-2 mb-4" on:submit=on_submit>
            <input
                type="text"
                placeholder="新任务标题"
                class="input input-bordered flex-1"
                on:input=move |ev| set_title.set(event_target_value(&ev))
                prop:value=title
            />
            <button class="btn btn-primary" disabled=move || is_pending.get()>
                "创建"
            </button>
            <Show when=move || error.get().is_some()>
                <span class="text-error text-sm self-center">
                    {move || error.get().unwrap_or_default()}
                </span>
            </Show>
        </form>
    }
}

#[component]
fn TaskList(filter: ListTasksRequest) -> impl IntoView {
    let tasks = use_tasks(filter);
    let update = use_update_task();
    let delete = use_delete_task();

    let data = tasks.data;
    let is_loading = tasks.is_loading;
    let error = tasks.error;

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body p-0">
                <Show when=move || error.get().is_some()>
                    <div class="alert alert-error m-4">
                        <span>{move || error.get().unwrap_or_default()}</span>
                    </div>
                </Show>
                <Show when=move || is_loading.get() && data.get().is_none()>
                    <div class="flex justify-center p-8">
                        <span class="loading loading-spinner loading-lg"></span>
                    </div>
                </Show>
                <table class="table">
                    <thead>
                        <tr>
                            <th>"标题"</th>
                            <th>"状态"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {
                            let update = update.clone();
                            let delete = delete.clone();
                            move || {
                                data.get()
                                    .unwrap_or_default()
                                    .into_iter()
                                    .map(|task| {
                                        view! {
                                            <TaskRow
                                                task=task
                                                update=update.clone()
                                                delete=delete.clone()
                                            />
                                        }
                                    })
                                    .collect_view()
                            }
                        }
                    </tbody>
                </table>
            </div>
        </div>
    }
}

#[component]
fn TaskRow(
    task: Task,
    update: crate::hooks::MutationHandle<UpdateTaskRequest>,
    delete: crate::hooks::MutationHandle<DeleteTaskRequest>,
) -> impl IntoView {
    let status_badge = match task.status {
        TaskStatus::Open => "badge badge-info",
        TaskStatus::InProgress => "badge badge-warning",
        TaskStatus::Done => "badge badge-success",
        TaskStatus::Cancelled => "badge badge-ghost",
    };

    let complete_id = task.id.clone();
    let delete_id = task.id.clone();
    let can_complete = !matches!(task.status, TaskStatus::Done | TaskStatus::Cancelled);

    view! {
        <tr>
            <td>{task.title.clone()}</td>
            <td>
                <span class=status_badge>{task.status.as_str()}</span>
            </td>
            <td class="flex gap-2 justify-end">
                <Show when=move || can_complete>
                    {
                        let update = update.clone();
                        let id = complete_id.clone();
                        view! {
                            <button
                                class="btn btn-xs btn-success"
                                on:click=move |_| {
                                    update
                                        .mutate(UpdateTaskRequest {
                                            id: id.clone(),
                                            title: None,
                                            status: Some(TaskStatus::Done),
                                            assignee_id: None,
                                        })
                                }
                            >
                                "完成"
                            </button>
                        }
                    }
                </Show>
                <button
                    class="btn btn-xs btn-error btn-outline"
                    on:click=move |_| delete.mutate(DeleteTaskRequest { id: delete_id.clone() })
                >
                    "删除"
                </button>
            </td>
        </tr>
    }
}
