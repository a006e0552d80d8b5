//! 成员页（用户名录）

use leptos::prelude::*;
use propcrm_shared::Role;

use crate::hooks::users::use_users;

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "管理员",
        Role::Agent => "经纪人",
        Role::Viewer => "访客",
    }
}

#[component]
pub fn UsersPage() -> impl IntoView {
    let users = use_users();

    let data = users.data;
    let is_loading = users.is_loading;
    let error = users.error;

    view! {
        <div>
            <h1 class="text-2xl font-bold mb-6">"团队成员"</h1>

            <Show when=move || error.get().is_some()>
                <div class="alert alert-error mb-4">
                    <span>{move || error.get().unwrap_or_default()}</span>
                </div>
            </Show>
            <Show when=move || is_loading.get() && data.get().is_none()>
                <div class="flex justify-center p-8">
                    <span class="loading loading-spinner loading-lg"></span>
                </div>
            </Show>

            <div class="card bg-base-100 shadow">
                <div class="card-body p-0">
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"姓名"</th>
                                <th>"邮箱"</th>
                                <th>"角色"</th>
                                <th>"状态"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || {
                                data.get()
                                    .unwrap_or_default()
                                    .into_iter()
                                    .map(|user| {
                                        view! {
                                            <tr>
                                                <td>{user.name}</td>
                                                <td>{user.email}</td>
                                                <td>
                                                    <span class="badge badge-outline">
                                                        {role_label(user.role)}
                                                    </span>
                                                </td>
                                                <td>
                                                    {if user.is_active {
                                                        view! { <span class="badge badge-success">"在职"</span> }
                                                    } else {
                                                        view! { <span class="badge badge-ghost">"停用"</span> }
                                                    }}
                                                </td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
