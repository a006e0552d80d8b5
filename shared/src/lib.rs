use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// REST 路径统一前缀，所有端点都挂在该版本前缀下
pub const API_PREFIX: &str = "/api/v1";

// =========================================================
// 用户与权限 (Users)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Agent,
    Viewer,
}

impl Default for Role {
    fn default() -> Self {
        Role::Agent
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// =========================================================
// 任务 (Tasks)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Done,
    Cancelled,
}

impl TaskStatus {
    /// 序列化后的字符串形式，用于构造查询参数和缓存 key
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// =========================================================
// 带看预约 (Viewings)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewingStatus {
    /// 申请人已请求带看，等待与日历确认（瞬态）
    Requested,
    /// 已确认排期
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl ViewingStatus {
    /// 是否仍在等待外部日历确认
    ///
    /// 只有 `Requested` 视为瞬态：已排期的未来带看不会再自行变化，
    /// 对它持续轮询会违反轮询终止约定。
    pub fn is_transient(&self) -> bool {
        matches!(self, ViewingStatus::Requested)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewing {
    pub id: String,
    pub property_id: String,
    pub applicant_name: String,
    #[serde(default)]
    pub applicant_email: Option<String>,
    pub status: ViewingStatus,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub agent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =========================================================
// AI 外呼 (AI Calls)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiCallStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl AiCallStatus {
    /// 通话是否仍在进行（排队中或通话中）
    pub fn is_transient(&self) -> bool {
        matches!(self, AiCallStatus::Queued | AiCallStatus::InProgress)
    }

    /// 终态：之后不会再有状态迁移
    pub fn is_terminal(&self) -> bool {
        !self.is_transient()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiCall {
    pub id: String,
    pub phone_number: String,
    #[serde(default)]
    pub purpose: Option<String>,
    pub status: AiCallStatus,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// =========================================================
// 日历事件与站内通知 (Events & Notifications)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub viewing_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// =========================================================
// 认证载荷 (Auth Payloads)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// 登录/注册/刷新成功后下发的令牌对
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

// =========================================================
// AI 助手对话 (Assistant Chat)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantChatRequest {
    pub message: String,
    /// 可选：围绕某次外呼记录展开的追问
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantChatResponse {
    pub reply: String,
}

// =========================================================
// 日历同步结果 (Calendar Sync)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// 本次同步更新的带看数量
    pub updated: u32,
}

// =========================================================
// 传输用错误体 (Wire Error Body)
// =========================================================

/// 服务端非 2xx 响应的标准 JSON 错误体
///
/// `message` 面向用户展示；`detail` 为字段级校验细节（仅 4xx 校验失败时出现）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
