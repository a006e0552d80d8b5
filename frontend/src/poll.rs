//! 轮询策略
//!
//! 所有资源的轮询判定集中在此：给定记录当前状态，返回下一次轮询间隔
//! 或"不再轮询"。终止保证只在这一个地方实现——状态一旦进入终态，
//! 无论消费视图重渲染多少次，都不会再排程轮询。

use std::time::Duration;

use propcrm_shared::{AiCallStatus, Notification, ViewingStatus};

/// 仍会自行变化、需要继续轮询的状态
pub trait TransientStatus {
    fn is_transient(&self) -> bool;
}

impl TransientStatus for AiCallStatus {
    fn is_transient(&self) -> bool {
        AiCallStatus::is_transient(self)
    }
}

impl TransientStatus for ViewingStatus {
    fn is_transient(&self) -> bool {
        ViewingStatus::is_transient(self)
    }
}

impl TransientStatus for Notification {
    /// 未读通知视为瞬态：存在未读时轮询以捕捉他端已读状态，
    /// 全部已读后停止。
    fn is_transient(&self) -> bool {
        !self.read
    }
}

/// 按资源参数化的轮询策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    interval: Duration,
}

impl PollPolicy {
    /// AI 外呼：通话进行中变化快，间隔取下限
    pub const AI_CALLS: PollPolicy = PollPolicy {
        interval: Duration::from_secs(5),
    };

    /// 带看预约：等待外部日历确认，变化慢
    pub const VIEWINGS: PollPolicy = PollPolicy {
        interval: Duration::from_secs(15),
    };

    /// 站内通知
    pub const NOTIFICATIONS: PollPolicy = PollPolicy {
        interval: Duration::from_secs(15),
    };

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 单条记录：瞬态 → 间隔；终态 → 不再轮询
    pub fn next<S: TransientStatus>(&self, status: &S) -> Option<Duration> {
        status.is_transient().then_some(self.interval)
    }

    /// 列表型资源：任一成员瞬态即继续轮询，全部终态则停止
    pub fn next_for_list<'a, S, I>(&self, statuses: I) -> Option<Duration>
    where
        S: TransientStatus + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        statuses
            .into_iter()
            .any(|s| s.is_transient())
            .then_some(self.interval)
    }
}

/// 同步调用的通知口径
///
/// 轮询期间的后台自动同步是静默的；用户手动触发的同步会弹出提示。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Silent,
    Notify,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn in_progress_call_polls_at_configured_interval() {
        assert_eq!(
            PollPolicy::AI_CALLS.next(&AiCallStatus::InProgress),
            Some(Duration::from_secs(5))
        );
        assert_eq!(
            PollPolicy::AI_CALLS.next(&AiCallStatus::Queued),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn terminal_call_stops_polling() {
        for status in [
            AiCallStatus::Completed,
            AiCallStatus::Failed,
            AiCallStatus::Cancelled,
        ] {
            assert_eq!(PollPolicy::AI_CALLS.next(&status), None);
        }
    }

    #[test]
    fn list_polls_while_any_member_is_transient() {
        let statuses = [
            AiCallStatus::Completed,
            AiCallStatus::InProgress,
            AiCallStatus::Failed,
        ];
        assert_eq!(
            PollPolicy::AI_CALLS.next_for_list(statuses.iter()),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn list_stops_when_no_member_is_transient() {
        let statuses = [AiCallStatus::Completed, AiCallStatus::Cancelled];
        assert_eq!(PollPolicy::AI_CALLS.next_for_list(statuses.iter()), None);

        let empty: [AiCallStatus; 0] = [];
        assert_eq!(PollPolicy::AI_CALLS.next_for_list(empty.iter()), None);
    }

    #[test]
    fn only_requested_viewings_are_transient() {
        assert_eq!(
            PollPolicy::VIEWINGS.next(&ViewingStatus::Requested),
            Some(Duration::from_secs(15))
        );
        for status in [
            ViewingStatus::Scheduled,
            ViewingStatus::Completed,
            ViewingStatus::Cancelled,
            ViewingStatus::NoShow,
        ] {
            assert_eq!(PollPolicy::VIEWINGS.next(&status), None);
        }
    }

    #[test]
    fn notifications_poll_until_all_read() {
        let unread = Notification {
            id: "n1".to_string(),
            message: "new applicant".to_string(),
            read: false,
            created_at: Utc::now(),
        };
        let read = Notification {
            read: true,
            ..unread.clone()
        };

        assert!(
            PollPolicy::NOTIFICATIONS
                .next_for_list([&unread, &read])
                .is_some()
        );
        assert_eq!(PollPolicy::NOTIFICATIONS.next_for_list([&read]), None);
    }
}
