//! 任务资源 hooks

use propcrm_shared::protocol::{
    ApiRequest, CreateTaskRequest, DeleteTaskRequest, ListTasksRequest, UpdateTaskRequest,
};
use propcrm_shared::Task;

use super::{use_mutation, use_query, MutationHandle, MutationOptions, QueryHandle, QueryOptions};
use crate::query::QueryKey;

pub const TASKS_RESOURCE: &str = "tasks";

/// 缓存 key 直接取端点的查询参数，保证与线上口径一致
fn tasks_key(filter: &ListTasksRequest) -> QueryKey {
    QueryKey::new(TASKS_RESOURCE).with_params(filter.query())
}

pub fn use_tasks(filter: ListTasksRequest) -> QueryHandle<Vec<Task>> {
    use_query(tasks_key(&filter), filter, QueryOptions::default())
}

/// 创建任务；成功后整族失效，所有任务列表（含按状态过滤的）重新拉取
pub fn use_create_task() -> MutationHandle<CreateTaskRequest> {
    use_mutation(MutationOptions {
        invalidates: &[TASKS_RESOURCE],
        success_message: Some("任务已创建"),
        toast_error: false,
    })
}

pub fn use_update_task() -> MutationHandle<UpdateTaskRequest> {
    use_mutation(MutationOptions {
        invalidates: &[TASKS_RESOURCE],
        success_message: Some("任务已更新"),
        toast_error: true,
    })
}

pub fn use_delete_task() -> MutationHandle<DeleteTaskRequest> {
    use_mutation(MutationOptions {
        invalidates: &[TASKS_RESOURCE],
        success_message: Some("任务已删除"),
        toast_error: true,
    })
}
