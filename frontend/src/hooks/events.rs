//! 日历事件资源 hooks
//!
//! 事件本身不轮询；带看同步成功时本族被连带失效。

use propcrm_shared::protocol::{ApiRequest, ListEventsRequest};
use propcrm_shared::CalendarEvent;

use super::{use_query, QueryHandle, QueryOptions};
use crate::query::QueryKey;

pub const EVENTS_RESOURCE: &str = "events";

fn events_key(filter: &ListEventsRequest) -> QueryKey {
    QueryKey::new(EVENTS_RESOURCE).with_params(filter.query())
}

pub fn use_events(filter: ListEventsRequest) -> QueryHandle<Vec<CalendarEvent>> {
    use_query(events_key(&filter), filter, QueryOptions::default())
}
