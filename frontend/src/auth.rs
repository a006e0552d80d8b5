//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 守卫组件通过 Context 读取认证信号来决定放行或重定向。
//!
//! 令牌（访问令牌 + 刷新令牌）持久化在 LocalStorage 的固定键下。
//! 对外的 login/logout/register 操作先完成存储写入，再以单次
//! update 更新内存状态，观察者不会看到半更新的会话。

use std::rc::Rc;

use leptos::prelude::*;
use propcrm_shared::protocol::MeRequest;
use propcrm_shared::{LoginRequest, RefreshRequest, RegisterRequest, TokenPair, User};

use crate::api::{ApiClient, HttpTransport, SessionBridge};
use crate::error::ApiResult;
use crate::web::console_log;
use crate::web::route::AppRoute;
use crate::web::router::RouterService;
use crate::web::LocalStorage;

/// 访问令牌存储键
pub const TOKEN_KEY: &str = "propcrm_token";
/// 刷新令牌存储键
pub const REFRESH_TOKEN_KEY: &str = "propcrm_refresh_token";

// =========================================================
// 状态与上下文
// =========================================================

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 当前登录用户（认证成功后存在）
    pub user: Option<User>,
    /// 是否已认证
    pub is_authenticated: bool,
    /// 是否正在解析持久化会话
    pub is_loading: bool,
    /// 当前访问令牌（仅内存镜像，权威副本在 LocalStorage）
    pub token: Option<String>,
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文（初始为加载中）
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState {
            is_loading: true,
            ..AuthState::default()
        });
        Self { state, set_state }
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

// =========================================================
// 令牌持久化
// =========================================================

pub fn stored_token() -> Option<String> {
    LocalStorage::get(TOKEN_KEY)
}

fn stored_refresh_token() -> Option<String> {
    LocalStorage::get(REFRESH_TOKEN_KEY)
}

fn store_tokens(pair: &TokenPair) {
    LocalStorage::set(TOKEN_KEY, &pair.token);
    LocalStorage::set(REFRESH_TOKEN_KEY, &pair.refresh_token);
}

pub fn clear_tokens() {
    LocalStorage::delete(TOKEN_KEY);
    LocalStorage::delete(REFRESH_TOKEN_KEY);
}

// =========================================================
// 会话桥接实现
// =========================================================

/// 浏览器环境下的 [`SessionBridge`] 实现
///
/// 客户端适配层经由它读取令牌、检查当前路径、以及在 401 时使会话过期。
pub struct BrowserSession {
    pub auth: AuthContext,
    pub router: RouterService,
}

impl SessionBridge for BrowserSession {
    fn bearer_token(&self) -> Option<String> {
        stored_token()
    }

    fn current_path(&self) -> String {
        self.router.current_route().get_untracked().to_path()
    }

    fn expire_session(&self, from: &str) {
        let plan = plan_expiry(self.auth.state.get_untracked().is_authenticated);
        if plan.clear_tokens {
            clear_tokens();
        }
        // 并发请求可能同时收到 401；状态重置与重定向只执行一次
        if !plan.reset_and_redirect {
            return;
        }
        console_log("[Auth] Session expired, clearing tokens.");
        self.auth.set_state.update(|state| {
            state.user = None;
            state.token = None;
            state.is_authenticated = false;
        });
        self.router.redirect_to_login(AppRoute::from_path(from));
    }
}

/// 单次 401 过期处置的分解
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ExpiryPlan {
    clear_tokens: bool,
    reset_and_redirect: bool,
}

/// 令牌清除无条件执行：启动校验遇网络故障时令牌会被保留而会话按
/// 未认证处理，此时的 401 仍须清掉过期令牌，否则每个后续请求都会
/// 继续携带它。状态重置与重定向只由首个仍观察到已认证状态的调用
/// 执行。
fn plan_expiry(is_authenticated: bool) -> ExpiryPlan {
    ExpiryPlan {
        clear_tokens: true,
        reset_and_redirect: is_authenticated,
    }
}

// =========================================================
// 操作
// =========================================================

fn apply_session(ctx: &AuthContext, token: String, user: Option<User>) {
    ctx.set_state.update(|state| {
        state.user = user;
        state.token = Some(token);
        state.is_authenticated = true;
        state.is_loading = false;
    });
}

fn apply_signed_out(ctx: &AuthContext) {
    ctx.set_state.update(|state| {
        state.user = None;
        state.token = None;
        state.is_authenticated = false;
        state.is_loading = false;
    });
}

/// 初始化认证状态
///
/// 校验持久化令牌；校验失败且存在刷新令牌时先尝试一次刷新，
/// 刷新也失败才宣告会话无效。网络故障不清除令牌（不是认证失败）。
pub async fn init_auth<T: HttpTransport>(ctx: &AuthContext, api: &ApiClient<T>) {
    if stored_token().is_none() {
        ctx.set_state.update(|state| state.is_loading = false);
        return;
    }

    match api.send_silent(&MeRequest).await {
        Ok(user) => {
            let token = stored_token().unwrap_or_default();
            apply_session(ctx, token, Some(user));
        }
        Err(err) if err.is_unauthorized() => {
            if let Some(refresh_token) = stored_refresh_token() {
                let refresh = RefreshRequest { refresh_token };
                if let Ok(pair) = api.send_silent(&refresh).await {
                    store_tokens(&pair);
                    let user = api.send_silent(&MeRequest).await.ok();
                    apply_session(ctx, pair.token, user);
                    console_log("[Auth] Session restored via refresh token.");
                    return;
                }
            }
            console_log("[Auth] Stored session invalid, signing out.");
            clear_tokens();
            apply_signed_out(ctx);
        }
        Err(_) => {
            // 网络故障：令牌保留，会话按未认证处理，用户可重试
            apply_signed_out(ctx);
        }
    }
}

/// 登录并保存状态
pub async fn login<T: HttpTransport>(
    ctx: &AuthContext,
    api: &ApiClient<T>,
    email: String,
    password: String,
) -> ApiResult<()> {
    let pair = api.send(&LoginRequest { email, password }).await?;
    store_tokens(&pair);
    let user = api.send_silent(&MeRequest).await.ok();
    apply_session(ctx, pair.token, user);
    Ok(())
}

/// 注册并直接进入已认证状态
pub async fn register<T: HttpTransport>(
    ctx: &AuthContext,
    api: &ApiClient<T>,
    name: String,
    email: String,
    password: String,
) -> ApiResult<()> {
    let pair = api
        .send(&RegisterRequest {
            name,
            email,
            password,
        })
        .await?;
    store_tokens(&pair);
    let user = api.send_silent(&MeRequest).await.ok();
    apply_session(ctx, pair.token, user);
    Ok(())
}

/// 注销并清除状态
///
/// 导航由守卫组件监听认证状态变化自动处理。
pub fn logout(ctx: &AuthContext) {
    clear_tokens();
    apply_signed_out(ctx);
}

/// 创建会话桥接（注入给客户端适配层）
pub fn browser_session(auth: AuthContext, router: RouterService) -> Rc<dyn SessionBridge> {
    Rc::new(BrowserSession { auth, router })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_clears_tokens_even_when_already_signed_out() {
        // 启动时网络故障保留了令牌、会话按未认证处理的场景：
        // 后续 401 依然必须清除过期令牌
        let plan = plan_expiry(false);
        assert!(plan.clear_tokens, "stale tokens must not survive a 401");
        assert!(!plan.reset_and_redirect, "no repeated redirect");
    }

    #[test]
    fn first_expiry_of_a_live_session_resets_and_redirects() {
        let plan = plan_expiry(true);
        assert!(plan.clear_tokens);
        assert!(plan.reset_and_redirect);
    }
}
