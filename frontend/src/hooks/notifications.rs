//! 站内通知 hooks
//!
//! 存在未读通知时轮询，全部已读后停止。

use std::rc::Rc;

use propcrm_shared::protocol::{ListNotificationsRequest, MarkNotificationReadRequest};
use propcrm_shared::Notification;

use super::{use_mutation, use_query, MutationHandle, MutationOptions, QueryHandle, QueryOptions};
use crate::poll::PollPolicy;
use crate::query::QueryKey;

pub const NOTIFICATIONS_RESOURCE: &str = "notifications";

pub fn use_notifications() -> QueryHandle<Vec<Notification>> {
    use_query(
        QueryKey::new(NOTIFICATIONS_RESOURCE),
        ListNotificationsRequest,
        QueryOptions {
            poll: Some(Rc::new(|list: &Vec<Notification>| {
                PollPolicy::NOTIFICATIONS.next_for_list(list.iter())
            })),
            ..QueryOptions::default()
        },
    )
}

pub fn use_mark_notification_read() -> MutationHandle<MarkNotificationReadRequest> {
    use_mutation(MutationOptions {
        invalidates: &[NOTIFICATIONS_RESOURCE],
        success_message: None,
        toast_error: true,
    })
}
