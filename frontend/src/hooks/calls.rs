//! AI 外呼资源 hooks
//!
//! 列表与详情都在存在排队/进行中的通话时轮询，终态后停止。

use std::rc::Rc;

use propcrm_shared::protocol::{
    CancelAiCallRequest, GetAiCallRequest, ListAiCallsRequest, StartAiCallRequest,
};
use propcrm_shared::AiCall;

use super::{use_mutation, use_query, MutationHandle, MutationOptions, QueryHandle, QueryOptions};
use crate::poll::PollPolicy;
use crate::query::QueryKey;

pub const CALLS_RESOURCE: &str = "calls";

pub fn use_ai_calls() -> QueryHandle<Vec<AiCall>> {
    use_query(
        QueryKey::new(CALLS_RESOURCE),
        ListAiCallsRequest,
        QueryOptions {
            poll: Some(Rc::new(|list: &Vec<AiCall>| {
                PollPolicy::AI_CALLS.next_for_list(list.iter().map(|c| &c.status))
            })),
            ..QueryOptions::default()
        },
    )
}

pub fn use_ai_call(id: String) -> QueryHandle<AiCall> {
    use_query(
        QueryKey::new(CALLS_RESOURCE).with("id", id.clone()),
        GetAiCallRequest { id },
        QueryOptions {
            poll: Some(Rc::new(|call: &AiCall| {
                PollPolicy::AI_CALLS.next(&call.status)
            })),
            ..QueryOptions::default()
        },
    )
}

pub fn use_start_call() -> MutationHandle<StartAiCallRequest> {
    use_mutation(MutationOptions {
        invalidates: &[CALLS_RESOURCE],
        success_message: Some("外呼已发起"),
        toast_error: false,
    })
}

pub fn use_cancel_call() -> MutationHandle<CancelAiCallRequest> {
    use_mutation(MutationOptions {
        invalidates: &[CALLS_RESOURCE],
        success_message: Some("外呼已取消"),
        toast_error: true,
    })
}
