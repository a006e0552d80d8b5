//! 带看资源 hooks
//!
//! 带看列表在存在待确认（requested）记录时自动轮询；轮询期间
//! 额外周期性触发一次与外部日历的静默同步，同步成功后使带看与
//! 日历事件两族缓存失效，订阅者随之刷新。全部进入终态后同步
//! 定时器被丢弃。

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use propcrm_shared::protocol::{ApiRequest, ListViewingsRequest, SyncViewingsRequest};
use propcrm_shared::Viewing;

use super::{use_mutation, use_query, MutationHandle, MutationOptions, QueryHandle, QueryOptions};
use crate::api::use_api;
use crate::hooks::events::EVENTS_RESOURCE;
use crate::poll::PollPolicy;
use crate::query::{use_query_client, QueryKey};
use crate::web::Interval;

pub const VIEWINGS_RESOURCE: &str = "viewings";

/// 缓存 key 直接取端点的查询参数，保证与线上口径一致
fn viewings_key(filter: &ListViewingsRequest) -> QueryKey {
    QueryKey::new(VIEWINGS_RESOURCE).with_params(filter.query())
}

/// 带看列表（含自动同步）
pub fn use_viewings(filter: ListViewingsRequest) -> QueryHandle<Vec<Viewing>> {
    let handle = use_query(
        viewings_key(&filter),
        filter,
        QueryOptions {
            poll: Some(Rc::new(|list: &Vec<Viewing>| {
                PollPolicy::VIEWINGS.next_for_list(list.iter().map(|v| &v.status))
            })),
            ..QueryOptions::default()
        },
    );

    // 静默自动同步：与列表轮询独立的定时器，列表数据决定其去留
    let api = use_api();
    let qc = use_query_client();
    let sync_timer: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
    let data = handle.data;
    Effect::new(move |_| {
        let wants_sync = data.get().and_then(|list| {
            PollPolicy::VIEWINGS.next_for_list(list.iter().map(|v| &v.status))
        });
        match wants_sync {
            Some(period) => {
                if sync_timer.borrow().is_none() {
                    let api = api.clone();
                    let qc = qc.clone();
                    let timer = Interval::new(period.as_millis() as u32, move || {
                        let api = api.clone();
                        let qc = qc.clone();
                        spawn_local(async move {
                            // 静默：成功不提示，失败留给下一轮
                            if api.send(&SyncViewingsRequest).await.is_ok() {
                                qc.invalidate_families(&[VIEWINGS_RESOURCE, EVENTS_RESOURCE]);
                            }
                        });
                    });
                    *sync_timer.borrow_mut() = Some(timer);
                }
            }
            None => {
                sync_timer.borrow_mut().take();
            }
        }
    });

    handle
}

/// 手动触发日历同步；与自动同步不同，结果会弹出提示
pub fn use_sync_viewings() -> MutationHandle<SyncViewingsRequest> {
    use_mutation(MutationOptions {
        invalidates: &[VIEWINGS_RESOURCE, EVENTS_RESOURCE],
        success_message: Some("日历同步完成"),
        toast_error: true,
    })
}
