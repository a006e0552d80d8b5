//! AI 外呼页
//!
//! 列表在存在排队/进行中的通话时每 5 秒轮询，全部终态后停止。
//! 右侧的助手对话框走可取消的长耗时请求。

use leptos::prelude::*;
use propcrm_shared::protocol::{CancelAiCallRequest, StartAiCallRequest};
use propcrm_shared::{AiCall, AiCallStatus};

use crate::hooks::assistant::use_assistant_chat;
use crate::hooks::calls::{use_ai_calls, use_cancel_call, use_start_call};

fn status_label(status: AiCallStatus) -> &'static str {
    match status {
        AiCallStatus::Queued => "排队中",
        AiCallStatus::InProgress => "通话中",
        AiCallStatus::Completed => "已完成",
        AiCallStatus::Failed => "失败",
        AiCallStatus::Cancelled => "已取消",
    }
}

fn status_badge(status: AiCallStatus) -> &'static str {
    match status {
        AiCallStatus::Queued => "badge badge-warning",
        AiCallStatus::InProgress => "badge badge-info",
        AiCallStatus::Completed => "badge badge-success",
        AiCallStatus::Failed => "badge badge-error",
        AiCallStatus::Cancelled => "badge badge-ghost",
    }
}

#[component]
pub fn CallsPage() -> impl IntoView {
    view! {
        <div>
            <h1 class="text-2xl font-bold mb-6">"AI 外呼"</h1>
            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                <div class="lg:col-span-2">
                    <StartCallForm />
                    <CallList />
                </div>
                <AssistantPanel />
            </div>
        </div>
    }
}

#[component]
fn StartCallForm() -> impl IntoView {
    let start = use_start_call();
    let (phone, set_phone) = signal(String::new());
    let (purpose, set_purpose) = signal(String::new());

    let is_pending = start.is_pending;
    let error = start.error;

    let on_submit = {
        let start = start.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let number = phone.get_untracked();
            if number.trim().is_empty() {
                return;
            }
            let purpose_value = purpose.get_untracked();
            start.mutate(StartAiCallRequest {
                phone_number: number,
                purpose: (!purpose_value.trim().is_empty()).then_some(purpose_value),
            });
            set_phone.set(String::new());
            set_purpose.set(String::new());
        }
    };

    view! {
        <form class="flex gap-2 mb-4" on:submit=on_submit>
            <input
                type="tel"
                placeholder="电话号码"
                class="input input-bordered"
                on:input=move |ev| set_phone.set(event_target_value(&ev))
                prop:value=phone
            />
            <input
                type="text"
                placeholder="外呼目的（可选）"
                class="input input-bordered flex-1"
                on:input=move |ev| set_purpose.set(event_target_value(&ev))
                prop:value=purpose
            />
            <button class="btn btn-primary" disabled=move || is_pending.get()>
                "发起外呼"
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
fn CallList() -> impl IntoView {
    let calls = use_ai_calls();
    let cancel = use_cancel_call();

    let data = calls.data;
    let is_loading = calls.is_loading;
    let error = calls.error;

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
                            <th>"号码"</th>
                            <th>"目的"</th>
                            <th>"状态"</th>
                            <th>"摘要"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {
                            let cancel = cancel.clone();
                            move || {
                                data.get()
                                    .unwrap_or_default()
                                    .into_iter()
                                    .map(|call| {
                                        view! { <CallRow call=call cancel=cancel.clone() /> }
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
fn CallRow(call: AiCall, cancel: crate::hooks::MutationHandle<CancelAiCallRequest>) -> impl IntoView {
    let cancellable = call.status.is_transient();
    let id = call.id.clone();

    view! {
        <tr>
            <td>{call.phone_number.clone()}</td>
            <td>{call.purpose.clone().unwrap_or_else(|| "-".to_string())}</td>
            <td>
                <span class=status_badge(call.status)>{status_label(call.status)}</span>
            </td>
            <td class="max-w-xs truncate">
                {call.summary.clone().unwrap_or_else(|| "-".to_string())}
            </td>
            <td>
                <Show when=move || cancellable>
                    {
                        let cancel = cancel.clone();
                        let id = id.clone();
                        view! {
                            <button
                                class="btn btn-xs btn-error btn-outline"
                                on:click=move |_| {
                                    cancel.mutate(CancelAiCallRequest { id: id.clone() })
                                }
                            >
                                "取消"
                            </button>
                        }
                    }
                </Show>
            </td>
        </tr>
    }
}

/// AI 助手对话框
#[component]
fn AssistantPanel() -> impl IntoView {
    let chat = use_assistant_chat(None);
    let (message, set_message) = signal(String::new());

    let reply = chat.reply;
    let is_pending = chat.is_pending;
    let error = chat.error;

    let on_submit = {
        let chat = chat.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let text = message.get_untracked();
            if text.trim().is_empty() {
                return;
            }
            chat.send(text);
            set_message.set(String::new());
        }
    };

    let on_cancel = {
        let chat = chat.clone();
        move |_| chat.cancel()
    };

    view! {
        <div class="card bg-base-100 shadow h-fit">
            <div class="card-body">
                <h2 class="card-title text-base">"AI 助手"</h2>

                <div class="min-h-24 bg-base-200 rounded-lg p-3 text-sm">
                    {move || {
                        if is_pending.get() {
                            view! { <span class="loading loading-dots loading-sm"></span> }
                                .into_any()
                        } else if let Some(text) = reply.get() {
                            text.into_any()
                        } else {
                            view! { <span class="opacity-60">"向助手询问外呼记录..."</span> }
                                .into_any()
                        }
                    }}
                </div>
                <Show when=move || error.get().is_some()>
                    <div class="text-error text-sm">
                        {move || error.get().unwrap_or_default()}
                    </div>
                </Show>

                <form class="flex gap-2 mt-2" on:submit=on_submit>
                    <input
                        type="text"
                        class="input input-bordered input-sm flex-1"
                        placeholder="输入问题"
                        on:input=move |ev| set_message.set(event_target_value(&ev))
                        prop:value=message
                    />
                    {move || {
                        if is_pending.get() {
                            let on_cancel = on_cancel.clone();
                            view! {
                                <button
                                    type="button"
                                    class="btn btn-sm btn-warning"
                                    on:click=on_cancel
                                >
                                    "停止"
                                </button>
                            }
                            .into_any()
                        } else {
                            view! { <button class="btn btn-sm btn-primary">"发送"</button> }
                                .into_any()
                        }
                    }}
                </form>
            </div>
        </div>
    }
}
