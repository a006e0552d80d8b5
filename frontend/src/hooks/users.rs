//! 用户资源 hooks
//!
//! 用户查询是显式选择单次重试的读取：人员名录偶发抖动时
//! 多试一次即可，401 不在重试范围内。

use propcrm_shared::protocol::{GetUserRequest, ListUsersRequest};
use propcrm_shared::User;

use super::{use_query, QueryHandle, QueryOptions};
use crate::query::QueryKey;

pub const USERS_RESOURCE: &str = "users";

pub fn use_users() -> QueryHandle<Vec<User>> {
    use_query(
        QueryKey::new(USERS_RESOURCE),
        ListUsersRequest,
        QueryOptions {
            retry_once: true,
            ..QueryOptions::default()
        },
    )
}

pub fn use_user(id: String) -> QueryHandle<User> {
    use_query(
        QueryKey::new(USERS_RESOURCE).with("id", id.clone()),
        GetUserRequest { id },
        QueryOptions {
            retry_once: true,
            ..QueryOptions::default()
        },
    )
}
