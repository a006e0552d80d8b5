use crate::{
    AiCall, AssistantChatRequest, AssistantChatResponse, CalendarEvent, LoginRequest, Notification,
    RefreshRequest, RegisterRequest, SyncOutcome, Task, TaskStatus, TokenPair, User, Viewing,
    ViewingStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// 该方法是否携带 JSON 请求体
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// 端点路径统一为 `/api/v1/<resource>[/<id>][/<action>]`。
/// 带路径参数的端点覆写 [`ApiRequest::path`]；带过滤条件的 GET 端点覆写
/// [`ApiRequest::query`]，由客户端拼接查询字符串。
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The URL path (or template, for id-bearing endpoints).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// 实例级路径：默认直接使用 `PATH`
    fn path(&self) -> String {
        Self::PATH.to_string()
    }

    /// 查询参数（仅 GET 端点使用）
    fn query(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

// =========================================================
// 认证端点 (Auth)
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = TokenPair;
    const PATH: &'static str = "/api/v1/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

impl ApiRequest for RegisterRequest {
    type Response = TokenPair;
    const PATH: &'static str = "/api/v1/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

impl ApiRequest for RefreshRequest {
    type Response = TokenPair;
    const PATH: &'static str = "/api/v1/auth/refresh";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// 校验持久化令牌是否仍然有效，返回当前用户
#[derive(Debug, Serialize, Deserialize)]
pub struct MeRequest;

impl ApiRequest for MeRequest {
    type Response = User;
    const PATH: &'static str = "/api/v1/auth/me";
    const METHOD: HttpMethod = HttpMethod::Get;
}

// =========================================================
// 任务端点 (Tasks)
// =========================================================

/// List tasks, optionally filtered by status and/or assignee
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ListTasksRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

impl ApiRequest for ListTasksRequest {
    type Response = Vec<Task>;
    const PATH: &'static str = "/api/v1/tasks";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        if let Some(status) = self.status {
            q.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(assignee) = &self.assignee_id {
            q.push(("assignee_id".to_string(), assignee.clone()));
        }
        q
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
}

impl ApiRequest for CreateTaskRequest {
    type Response = Task;
    const PATH: &'static str = "/api/v1/tasks";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Partial update; absent fields are left unchanged by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}

impl ApiRequest for UpdateTaskRequest {
    type Response = Task;
    const PATH: &'static str = "/api/v1/tasks";
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTaskRequest {
    pub id: String,
}

impl ApiRequest for DeleteTaskRequest {
    type Response = ();
    const PATH: &'static str = "/api/v1/tasks";
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

// =========================================================
// 用户端点 (Users)
// =========================================================

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Response = Vec<User>;
    const PATH: &'static str = "/api/v1/users";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserRequest {
    pub id: String,
}

impl ApiRequest for GetUserRequest {
    type Response = User;
    const PATH: &'static str = "/api/v1/users";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

// =========================================================
// 带看端点 (Viewings)
// =========================================================

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ListViewingsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ViewingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
}

impl ApiRequest for ListViewingsRequest {
    type Response = Vec<Viewing>;
    const PATH: &'static str = "/api/v1/viewings";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        if let Some(status) = self.status {
            // snake_case 与序列化保持一致
            let s = match status {
                ViewingStatus::Requested => "requested",
                ViewingStatus::Scheduled => "scheduled",
                ViewingStatus::Completed => "completed",
                ViewingStatus::Cancelled => "cancelled",
                ViewingStatus::NoShow => "no_show",
            };
            q.push(("status".to_string(), s.to_string()));
        }
        if let Some(property) = &self.property_id {
            q.push(("property_id".to_string(), property.clone()));
        }
        q
    }
}

/// 触发一次与外部日历的同步，返回更新条数
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SyncViewingsRequest;

impl ApiRequest for SyncViewingsRequest {
    type Response = SyncOutcome;
    const PATH: &'static str = "/api/v1/viewings/sync";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// AI 外呼端点 (AI Calls)
// =========================================================

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ListAiCallsRequest;

impl ApiRequest for ListAiCallsRequest {
    type Response = Vec<AiCall>;
    const PATH: &'static str = "/api/v1/calls";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAiCallRequest {
    pub id: String,
}

impl ApiRequest for GetAiCallRequest {
    type Response = AiCall;
    const PATH: &'static str = "/api/v1/calls";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartAiCallRequest {
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl ApiRequest for StartAiCallRequest {
    type Response = AiCall;
    const PATH: &'static str = "/api/v1/calls";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAiCallRequest {
    pub id: String,
}

impl ApiRequest for CancelAiCallRequest {
    type Response = AiCall;
    const PATH: &'static str = "/api/v1/calls";
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("{}/{}/cancel", Self::PATH, self.id)
    }
}

impl ApiRequest for AssistantChatRequest {
    type Response = AssistantChatResponse;
    const PATH: &'static str = "/api/v1/assistant/chat";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// 日历与通知端点 (Events & Notifications)
// =========================================================

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ListEventsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl ApiRequest for ListEventsRequest {
    type Response = Vec<CalendarEvent>;
    const PATH: &'static str = "/api/v1/events";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        if let Some(from) = self.from {
            q.push(("from".to_string(), from.to_rfc3339()));
        }
        if let Some(to) = self.to {
            q.push(("to".to_string(), to.to_rfc3339()));
        }
        q
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ListNotificationsRequest;

impl ApiRequest for ListNotificationsRequest {
    type Response = Vec<Notification>;
    const PATH: &'static str = "/api/v1/notifications";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkNotificationReadRequest {
    pub id: String,
}

impl ApiRequest for MarkNotificationReadRequest {
    type Response = Notification;
    const PATH: &'static str = "/api/v1/notifications";
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("{}/{}/read", Self::PATH, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_bearing_endpoints_embed_the_id() {
        let update = UpdateTaskRequest {
            id: "t1".to_string(),
            title: None,
            status: None,
            assignee_id: None,
        };
        assert_eq!(update.path(), "/api/v1/tasks/t1");

        let cancel = CancelAiCallRequest { id: "c9".to_string() };
        assert_eq!(cancel.path(), "/api/v1/calls/c9/cancel");

        let read = MarkNotificationReadRequest { id: "n3".to_string() };
        assert_eq!(read.path(), "/api/v1/notifications/n3/read");
    }

    #[test]
    fn list_filters_become_query_pairs() {
        let filter = ListTasksRequest {
            status: Some(TaskStatus::InProgress),
            assignee_id: Some("u1".to_string()),
        };
        assert_eq!(
            filter.query(),
            vec![
                ("status".to_string(), "in_progress".to_string()),
                ("assignee_id".to_string(), "u1".to_string()),
            ]
        );
        assert!(ListTasksRequest::default().query().is_empty());
    }

    #[test]
    fn update_request_body_omits_the_path_id() {
        let update = UpdateTaskRequest {
            id: "t1".to_string(),
            title: Some("回访".to_string()),
            status: None,
            assignee_id: None,
        };
        let body = serde_json::to_string(&update).unwrap();
        assert!(!body.contains("t1"));
        assert!(body.contains("回访"));
    }

    #[test]
    fn methods_with_bodies() {
        assert!(HttpMethod::Post.has_body());
        assert!(HttpMethod::Put.has_body());
        assert!(!HttpMethod::Get.has_body());
        assert!(!HttpMethod::Delete.has_body());
    }
}
