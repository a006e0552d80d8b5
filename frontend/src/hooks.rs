//! 资源 hooks
//!
//! 展示层与数据层之间唯一的通道。读取 hook 暴露
//! `{ data, is_loading, error }`，变更 hook 暴露 `{ mutate, is_pending }`；
//! 组件不得绕过 hooks 直接调用客户端适配层。
//!
//! 通用引擎在本文件：`use_query` 负责缓存订阅、拉取去重、轮询排程；
//! `use_mutation` 负责失效与提示。各资源的具体 hook 按实体拆分在子模块。

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use propcrm_shared::protocol::ApiRequest;

use crate::api::use_api;
use crate::query::{use_query_client, QueryKey};
use crate::toast::use_toasts;
use crate::web::Interval;

pub mod assistant;
pub mod calls;
pub mod events;
pub mod notifications;
pub mod tasks;
pub mod users;
pub mod viewings;

// =========================================================
// 读取引擎 (use_query)
// =========================================================

/// 读取 hook 的返回句柄
///
/// 回调经由 `StoredValue::new_local` 存放，句柄整体 `Copy`，
/// 可以直接在视图闭包里捕获。
pub struct QueryHandle<T: 'static> {
    pub data: ReadSignal<Option<T>>,
    pub is_loading: ReadSignal<bool>,
    pub error: ReadSignal<Option<String>>,
    refetch: StoredValue<Rc<dyn Fn()>, LocalStorage>,
}

impl<T> QueryHandle<T> {
    /// 手动重新拉取
    pub fn refetch(&self) {
        self.refetch.with_value(|f| f());
    }
}

impl<T> Clone for QueryHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for QueryHandle<T> {}

/// 读取 hook 的配置
pub struct QueryOptions<Resp> {
    /// 失败后重试一次（仅显式选择的读取，如用户查询）
    pub retry_once: bool,
    /// 轮询判定：依据最近一次结果决定下一次轮询间隔
    pub poll: Option<Rc<dyn Fn(&Resp) -> Option<Duration>>>,
}

impl<Resp> Default for QueryOptions<Resp> {
    fn default() -> Self {
        Self {
            retry_once: false,
            poll: None,
        }
    }
}

/// 通用读取 hook
///
/// - 同一 key 的缓存写入会同步到所有订阅者
/// - 失效后的下一次求值自动重新拉取
/// - 轮询间隔由结果状态决定，进入终态后定时器被丢弃（drop 即停止）
pub fn use_query<R>(
    key: QueryKey,
    request: R,
    options: QueryOptions<R::Response>,
) -> QueryHandle<R::Response>
where
    R: ApiRequest + Clone + 'static,
    R::Response: Clone + Send + Sync + 'static,
{
    let api = use_api();
    let qc = use_query_client();

    let (data, set_data) = signal(Option::<R::Response>::None);
    let (is_loading, set_is_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    // 轮询定时器：Some 在跑，take 即停止
    let poll_timer: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
    let (poll_tick, set_poll_tick) = signal(0u64);

    let retry_once = options.retry_once;
    let poll = options.poll;

    let do_fetch: Rc<dyn Fn()> = Rc::new({
        let key = key.clone();
        let api = api.clone();
        let qc = qc.clone();
        let poll_timer = poll_timer.clone();
        move || {
            let ticket = qc.begin_fetch(&key);
            set_is_loading.set(true);

            let key = key.clone();
            let api = api.clone();
            let qc = qc.clone();
            let request = request.clone();
            let poll = poll.clone();
            let poll_timer = poll_timer.clone();
            spawn_local(async move {
                let result = if retry_once {
                    api.send_retry_once(&request).await
                } else {
                    api.send(&request).await
                };
                match result {
                    Ok(value) => {
                        let json = serde_json::to_value(&value).unwrap_or(serde_json::Value::Null);
                        // 过期票据（期间已发起更新的拉取）直接丢弃
                        if qc.complete_fetch(&key, ticket, json) {
                            set_error.set(None);
                            // 依据最新结果重排轮询
                            if let Some(poll) = &poll {
                                match poll(&value) {
                                    Some(period) => {
                                        let timer = Interval::new(period.as_millis() as u32, move || {
                                            set_poll_tick.update(|t| *t += 1);
                                        });
                                        *poll_timer.borrow_mut() = Some(timer);
                                    }
                                    None => {
                                        poll_timer.borrow_mut().take();
                                    }
                                }
                            }
                        }
                    }
                    Err(err) => {
                        qc.fail_fetch(&key, ticket);
                        set_error.set(Some(err.user_message()));
                    }
                }
                set_is_loading.set(false);
            });
        }
    });

    // 订阅缓存版本与轮询节拍；新鲜数据直接从缓存水合，
    // 失效或轮询到点则重新拉取。
    {
        let key = key.clone();
        let qc = qc.clone();
        let do_fetch = do_fetch.clone();
        Effect::new(move |prev_tick: Option<u64>| {
            let tick = poll_tick.get();
            let _ = qc.version().get();

            let fresh = qc.is_fresh(&key);
            if fresh {
                if let Some(value) = qc.cached(&key) {
                    if let Ok(typed) = serde_json::from_value::<R::Response>(value) {
                        set_data.set(Some(typed));
                    }
                }
                set_is_loading.set(false);
            }

            // 失败是静止态：不自动重试，直到失效、轮询到点或显式
            // refetch。wants_fetch 对 Fetching/Error 均返回 false。
            let tick_fired = prev_tick.is_some_and(|p| p != tick);
            if tick_fired || qc.wants_fetch(&key) {
                do_fetch();
            }
            tick
        });
    }

    QueryHandle {
        data,
        is_loading,
        error,
        refetch: StoredValue::new_local(do_fetch),
    }
}

// =========================================================
// 变更引擎 (use_mutation)
// =========================================================

/// 变更 hook 的配置
#[derive(Clone, Copy)]
pub struct MutationOptions {
    /// 成功后整族失效的资源名
    pub invalidates: &'static [&'static str],
    /// 成功提示文案（None 则静默）
    pub success_message: Option<&'static str>,
    /// 是否把错误弹为全局提示（表单类错误通常内联展示）
    pub toast_error: bool,
}

/// 变更 hook 的返回句柄
pub struct MutationHandle<R>
where
    R: ApiRequest + 'static,
    R::Response: Send + Sync + 'static,
{
    mutate: StoredValue<Rc<dyn Fn(R)>, LocalStorage>,
    pub is_pending: ReadSignal<bool>,
    pub error: ReadSignal<Option<String>>,
    pub data: ReadSignal<Option<R::Response>>,
}

impl<R> MutationHandle<R>
where
    R: ApiRequest + 'static,
    R::Response: Send + Sync + 'static,
{
    pub fn mutate(&self, input: R) {
        self.mutate.with_value(|f| f(input));
    }
}

impl<R> Clone for MutationHandle<R>
where
    R: ApiRequest + 'static,
    R::Response: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for MutationHandle<R>
where
    R: ApiRequest + 'static,
    R::Response: Send + Sync + 'static,
{
}

/// 通用变更 hook
///
/// 成功后按资源族失效缓存；被失效 key 的订阅者会在下一次
/// 求值时重新拉取，变更方不直接写缓存数据。
pub fn use_mutation<R>(options: MutationOptions) -> MutationHandle<R>
where
    R: ApiRequest + 'static,
    R::Response: Clone + Send + Sync + 'static,
{
    let api = use_api();
    let qc = use_query_client();
    let toasts = use_toasts();

    let (is_pending, set_is_pending) = signal(false);
    let (error, set_error) = signal(Option::<String>::None);
    let (data, set_data) = signal(Option::<R::Response>::None);

    let mutate: Rc<dyn Fn(R)> = Rc::new(move |input: R| {
        set_is_pending.set(true);
        set_error.set(None);

        let api = api.clone();
        let qc = qc.clone();
        spawn_local(async move {
            match api.send(&input).await {
                Ok(value) => {
                    qc.invalidate_families(options.invalidates);
                    if let Some(message) = options.success_message {
                        toasts.success(message);
                    }
                    set_data.set(Some(value));
                }
                Err(err) => {
                    let message = match &err.detail {
                        Some(detail) => format!("{} ({})", err.user_message(), detail),
                        None => err.user_message(),
                    };
                    if options.toast_error {
                        toasts.error(message.clone());
                    }
                    set_error.set(Some(message));
                }
            }
            set_is_pending.set(false);
        });
    });

    MutationHandle {
        mutate: StoredValue::new_local(mutate),
        is_pending,
        error,
        data,
    }
}
