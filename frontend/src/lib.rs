//! PropCRM 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理（会话解析、令牌持久化、401 过期处置）
//! - `guard`: 受保护路由守卫（显式状态机）
//! - `query` + `hooks`: 查询缓存与资源 hooks
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod calls;
    pub mod dashboard;
    pub mod login;
    pub mod property;
    pub mod register;
    pub mod shell;
    pub mod tasks;
    pub mod users;
    pub mod viewings;
}
mod config;
mod error;
mod guard;
mod hooks;
mod poll;
mod query;
mod settings;
mod toast;

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

use crate::api::{provide_api, ApiClient, FetchTransport};
use crate::auth::{browser_session, init_auth, AuthContext};
use crate::components::calls::CallsPage;
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::components::property::PropertyPage;
use crate::components::register::RegisterPage;
use crate::components::shell::Shell;
use crate::components::tasks::TasksPage;
use crate::components::users::UsersPage;
use crate::components::viewings::ViewingsPage;
use crate::guard::RequireAuth;
use crate::query::provide_query_client;
use crate::settings::provide_settings;
use crate::toast::{provide_toasts, ToastHost};

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod events;
    mod log;
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use log::console_log;
    pub use storage::LocalStorage;
    pub use timer::Interval;
}

use web::route::AppRoute;
use web::router::{provide_router, RouterOutlet};

/// 路由匹配函数
///
/// 受保护页面统一包在 `RequireAuth` 与应用外壳里；
/// 认证入口与 404 裸渲染。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => protected(|| view! { <DashboardPage /> }.into_any()),
        AppRoute::Tasks => protected(|| view! { <TasksPage /> }.into_any()),
        AppRoute::Users => protected(|| view! { <UsersPage /> }.into_any()),
        AppRoute::Viewings => protected(|| view! { <ViewingsPage /> }.into_any()),
        AppRoute::Calls => protected(|| view! { <CallsPage /> }.into_any()),
        AppRoute::Property(id) => view! {
            <RequireAuth>
                {
                    let id = id.clone();
                    view! { <Shell><PropertyPage id=id /></Shell> }
                }
            </RequireAuth>
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

fn protected(page: fn() -> AnyView) -> AnyView {
    view! {
        <RequireAuth>
            <Shell>{page()}</Shell>
        </RequireAuth>
    }
    .into_any()
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 基础上下文：认证、设置、提示、查询缓存、路由
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    provide_settings();
    provide_toasts();
    provide_query_client();
    let router = provide_router();

    // 2. 客户端适配层：注入会话桥接，401 在此集中处置
    let session = browser_session(auth_ctx, router);
    let client = Rc::new(ApiClient::new(
        config::api_base_url(),
        FetchTransport,
        session,
    ));
    provide_api(client.clone());

    // 3. 解析持久化会话（异步；期间守卫渲染占位而非重定向）
    spawn_local(async move {
        init_auth(&auth_ctx, &client).await;
    });

    view! {
        <ToastHost />
        <RouterOutlet matcher=route_matcher />
    }
}
