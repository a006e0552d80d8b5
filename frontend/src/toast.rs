//! 全局提示条
//!
//! 瞬时通知：变更结果、服务端错误等。3 秒后自动清除。
//! 静默后台同步不经过这里。

use leptos::prelude::*;

/// 一条提示消息
#[derive(Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub is_error: bool,
}

#[derive(Clone, Copy)]
pub struct ToastContext {
    state: ReadSignal<Option<Toast>>,
    set_state: WriteSignal<Option<Toast>>,
}

impl ToastContext {
    pub fn success(&self, message: impl Into<String>) {
        self.set_state.set(Some(Toast {
            message: message.into(),
            is_error: false,
        }));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.set_state.set(Some(Toast {
            message: message.into(),
            is_error: true,
        }));
    }
}

/// 注入提示上下文
pub fn provide_toasts() -> ToastContext {
    let (state, set_state) = signal(Option::<Toast>::None);
    let ctx = ToastContext { state, set_state };

    // 3秒后清除通知
    Effect::new(move |_| {
        if state.get().is_some() {
            set_timeout(
                move || set_state.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    provide_context(ctx);
    ctx
}

pub fn use_toasts() -> ToastContext {
    use_context::<ToastContext>().expect("ToastContext should be provided")
}

/// 提示条宿主组件（置于应用根部）
#[component]
pub fn ToastHost() -> impl IntoView {
    let ctx = use_toasts();
    let state = ctx.state;

    view! {
        <Show when=move || state.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    if state.get().map(|t| t.is_error).unwrap_or(false) {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || state.get().map(|t| t.message).unwrap_or_default()}</span>
                </div>
            </div>
        </Show>
    }
}
