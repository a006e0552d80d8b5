//! AI 助手对话 hook
//!
//! 对话是长耗时请求，用户可以随时中止。中止后在途请求的结果
//! （无论成败）被整体丢弃，挂起标志立即复位，组件可马上发起新对话。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use propcrm_shared::AssistantChatRequest;

use crate::api::{use_api, CancelHandle};

/// 对话句柄（`Copy`，回调存放在本地存储的 `StoredValue` 里）
#[derive(Clone, Copy)]
pub struct ChatHandle {
    send: StoredValue<Rc<dyn Fn(String)>, LocalStorage>,
    cancel: StoredValue<Rc<dyn Fn()>, LocalStorage>,
    pub reply: ReadSignal<Option<String>>,
    pub is_pending: ReadSignal<bool>,
    pub error: ReadSignal<Option<String>>,
}

impl ChatHandle {
    pub fn send(&self, message: String) {
        self.send.with_value(|f| f(message));
    }

    pub fn cancel(&self) {
        self.cancel.with_value(|f| f());
    }
}

pub fn use_assistant_chat(call_id: Option<String>) -> ChatHandle {
    let api = use_api();

    let (reply, set_reply) = signal(Option::<String>::None);
    let (is_pending, set_is_pending) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);

    // 在途请求的取消句柄；cancel 置位后异步完成路径不再写任何信号
    let in_flight: Rc<RefCell<Option<Rc<CancelHandle>>>> = Rc::new(RefCell::new(None));
    let cancelled = Rc::new(Cell::new(false));

    let send: Rc<dyn Fn(String)> = Rc::new({
        let api = api.clone();
        let in_flight = in_flight.clone();
        let cancelled = cancelled.clone();
        move |message: String| {
            // 新对话开始前先中止上一个在途请求
            if let Some(previous) = in_flight.borrow_mut().take() {
                previous.cancel();
            }
            cancelled.set(false);
            set_is_pending.set(true);
            set_error.set(None);

            let handle = Rc::new(CancelHandle::new());
            *in_flight.borrow_mut() = Some(handle.clone());

            let api = api.clone();
            let in_flight = in_flight.clone();
            let cancelled = cancelled.clone();
            let request = AssistantChatRequest {
                message,
                call_id: call_id.clone(),
            };
            spawn_local(async move {
                let result = api.send_with(&request, Some(handle.as_ref())).await;
                if cancelled.get() {
                    return;
                }
                match result {
                    Ok(response) => set_reply.set(Some(response.reply)),
                    Err(err) => set_error.set(Some(err.user_message())),
                }
                set_is_pending.set(false);
                in_flight.borrow_mut().take();
            });
        }
    });

    let cancel: Rc<dyn Fn()> = Rc::new({
        let in_flight = in_flight.clone();
        let cancelled = cancelled.clone();
        move || {
            if let Some(handle) = in_flight.borrow_mut().take() {
                cancelled.set(true);
                handle.cancel();
                set_is_pending.set(false);
            }
        }
    });

    ChatHandle {
        send: StoredValue::new_local(send),
        cancel: StoredValue::new_local(cancel),
        reply,
        is_pending,
        error,
    }
}
