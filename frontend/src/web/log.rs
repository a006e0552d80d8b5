//! 控制台日志封装
//!
//! 非 wasm 目标（本地 `cargo test`）下不可调用 `web_sys::console`，
//! 统一经由此函数输出。

pub fn console_log(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&msg.into());

    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}
