//! window 级事件监听封装
//!
//! 用于跨组件广播（如"认证开关已变更"）。监听器被 drop 时自动移除；
//! 对需要伴随应用整个生命周期的监听器，调用 [`EventListener::forget`]。

use wasm_bindgen::prelude::*;

/// window 上某个事件名的监听器句柄
pub struct EventListener {
    name: &'static str,
    closure: Closure<dyn Fn(web_sys::Event)>,
}

impl EventListener {
    /// 在 window 上注册监听器
    pub fn new<F>(name: &'static str, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |_event| callback());

        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }

        Self { name, closure }
    }

    /// 泄漏闭包以保持监听器永久存活
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback(self.name, self.closure.as_ref().unchecked_ref());
        }
    }
}

/// 在 window 上派发一个自定义事件（广播通知）
pub fn dispatch(name: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(event) = web_sys::CustomEvent::new(name) {
            let _ = window.dispatch_event(&event);
        }
    }
}
