//! 应用设置：认证开关
//!
//! "是否要求认证"是进程级布尔开关，持久化在 LocalStorage，缺省开启。
//! 运行时变更通过 window 级自定义事件广播；守卫组件订阅信号后
//! 会从 Loading 重新计算。

use leptos::prelude::*;

use crate::web::console_log;
use crate::web::events::{self, EventListener};
use crate::web::LocalStorage;

/// 认证开关存储键
pub const AUTH_REQUIRED_KEY: &str = "propcrm_auth_required";
/// 设置变更广播事件名
pub const SETTINGS_EVENT: &str = "propcrm:settings-changed";

/// 读取持久化的认证开关（缺省开启）
fn read_auth_required() -> bool {
    match LocalStorage::get(AUTH_REQUIRED_KEY).as_deref() {
        Some("false") => false,
        _ => true,
    }
}

/// 设置上下文
#[derive(Clone, Copy)]
pub struct SettingsContext {
    /// 认证开关（只读信号，守卫在求值时读取）
    pub auth_required: ReadSignal<bool>,
}

/// 注入设置上下文并挂载广播监听
pub fn provide_settings() -> SettingsContext {
    let (auth_required, set_auth_required) = signal(read_auth_required());

    // 广播到达时重读持久化值；监听器伴随应用整个生命周期
    EventListener::new(SETTINGS_EVENT, move || {
        let value = read_auth_required();
        console_log(&format!("[Settings] Auth requirement changed: {}", value));
        set_auth_required.set(value);
    })
    .forget();

    let ctx = SettingsContext { auth_required };
    provide_context(ctx);
    ctx
}

/// 从 Context 获取设置
pub fn use_settings() -> SettingsContext {
    use_context::<SettingsContext>().expect("SettingsContext should be provided")
}

/// 更新认证开关：写入存储并广播
pub fn set_auth_required(value: bool) {
    LocalStorage::set(AUTH_REQUIRED_KEY, if value { "true" } else { "false" });
    events::dispatch(SETTINGS_EVENT);
}
