//! 受保护路由守卫
//!
//! 显式有限状态机，四个状态：
//! {Loading, AuthNotRequired, Authenticated, Redirecting}。
//! 状态只由离散输入驱动（认证开关、会话快照、当前路径），
//! 不依赖渲染时序。核心正确性约定是"每个位置最多重定向一次"：
//! 会话加载抖动引起的重复求值不会反复压入导航、冲刷浏览器历史。

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use crate::auth::use_auth;
use crate::settings::use_settings;
use crate::web::console_log;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[cfg(test)]
mod tests;

// =========================================================
// 状态机
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// 会话仍在解析，不做任何重定向决定
    Loading,
    /// 认证开关关闭：无条件放行，不再读取会话
    AuthNotRequired,
    Authenticated,
    /// 已对当前位置发出过导航，后续求值只渲染占位
    Redirecting,
}

/// 守卫求值所需的会话快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub is_loading: bool,
    pub is_authenticated: bool,
}

/// 单次求值的渲染/导航决定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    RenderChildren,
    Placeholder,
    /// 发出一次到登录页的导航，携带来源位置
    Navigate { from: String },
}

/// 路由守卫状态机
#[derive(Debug)]
pub struct RouteGuard {
    state: GuardState,
    /// 已为该位置发出过导航；位置变化时重置
    redirected_from: Option<String>,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self {
            state: GuardState::Loading,
            redirected_from: None,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// 认证开关变更：从 Loading 重新计算
    pub fn on_flag_changed(&mut self) {
        self.state = GuardState::Loading;
        self.redirected_from = None;
    }

    /// 求值
    ///
    /// 开关关闭时最先短路返回，完全不触碰会话状态。
    pub fn evaluate(
        &mut self,
        auth_required: bool,
        session: SessionSnapshot,
        location: &str,
    ) -> GuardOutcome {
        if !auth_required {
            self.state = GuardState::AuthNotRequired;
            return GuardOutcome::RenderChildren;
        }

        if session.is_loading {
            // 会话未解析完不做重定向决定，避免对仍在恢复的会话过早跳转
            self.state = GuardState::Loading;
            return GuardOutcome::Placeholder;
        }

        if session.is_authenticated {
            self.state = GuardState::Authenticated;
            self.redirected_from = None;
            return GuardOutcome::RenderChildren;
        }

        self.state = GuardState::Redirecting;
        match &self.redirected_from {
            // 同一位置的重复求值：抑制再次导航
            Some(prev) if prev == location => GuardOutcome::Placeholder,
            _ => {
                self.redirected_from = Some(location.to_string());
                GuardOutcome::Navigate {
                    from: location.to_string(),
                }
            }
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================
// 组件
// =========================================================

/// 渲染决定（组件内部信号）
#[derive(Clone, Copy, PartialEq, Eq)]
enum GuardView {
    Placeholder,
    Children,
}

/// 受保护内容包装组件
///
/// 状态机在 Effect 中求值，导航作为副作用在同一处发出；
/// 视图只订阅求值结果。
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let settings = use_settings();
    let router = use_router();

    let guard = Rc::new(RefCell::new(RouteGuard::new()));
    let prev_flag: Rc<RefCell<Option<bool>>> = Rc::new(RefCell::new(None));
    let (view_state, set_view_state) = signal(GuardView::Placeholder);

    Effect::new(move |_| {
        let auth_required = settings.auth_required.get();
        let location = router.current_route().get().to_path();

        let mut guard = guard.borrow_mut();

        // 开关变更是离散事件：回到 Loading 并清除重定向抑制
        let mut prev = prev_flag.borrow_mut();
        if prev.is_some_and(|p| p != auth_required) {
            guard.on_flag_changed();
        }
        *prev = Some(auth_required);

        // 开关关闭时不读取会话信号：状态机不会用到快照，
        // 且会话变化不应触发本 Effect 重新求值
        let session = if auth_required {
            let state = auth.state.get();
            SessionSnapshot {
                is_loading: state.is_loading,
                is_authenticated: state.is_authenticated,
            }
        } else {
            SessionSnapshot {
                is_loading: false,
                is_authenticated: false,
            }
        };

        match guard.evaluate(auth_required, session, &location) {
            GuardOutcome::RenderChildren => set_view_state.set(GuardView::Children),
            GuardOutcome::Placeholder => set_view_state.set(GuardView::Placeholder),
            GuardOutcome::Navigate { from } => {
                console_log(&format!("[Guard] Unauthenticated at {}, redirecting.", from));
                router.redirect_to_login(AppRoute::from_path(&from));
                set_view_state.set(GuardView::Placeholder);
            }
        }
    });

    move || match view_state.get() {
        GuardView::Children => children().into_any(),
        GuardView::Placeholder => view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
    }
}
