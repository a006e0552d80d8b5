//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (认证入口)
    #[default]
    Login,
    /// 注册页面 (认证入口)
    Register,
    /// 控制面板 (需要认证)
    Dashboard,
    /// 任务列表 (需要认证)
    Tasks,
    /// 用户管理 (需要认证)
    Users,
    /// 带看预约 (需要认证)
    Viewings,
    /// AI 外呼 (需要认证)
    Calls,
    /// 房源详情 (需要认证)
    Property(String),
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/tasks" => Self::Tasks,
            "/users" => Self::Users,
            "/viewings" => Self::Viewings,
            "/calls" => Self::Calls,
            _ => {
                if let Some(id) = path.strip_prefix("/properties/") {
                    if !id.is_empty() && !id.contains('/') {
                        return Self::Property(id.to_string());
                    }
                }
                Self::NotFound
            }
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Tasks => "/tasks".to_string(),
            Self::Users => "/users".to_string(),
            Self::Viewings => "/viewings".to_string(),
            Self::Calls => "/calls".to_string(),
            Self::Property(id) => format!("/properties/{}", id),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Register | Self::NotFound)
    }

    /// 认证入口（登录/注册）：全局 401 处理对其豁免，避免重定向循环
    pub fn is_auth_entry(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/register"), AppRoute::Register);
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/tasks"), AppRoute::Tasks);
        assert_eq!(AppRoute::from_path("/unknown"), AppRoute::NotFound);
    }

    #[test]
    fn parses_property_detail() {
        assert_eq!(
            AppRoute::from_path("/properties/42"),
            AppRoute::Property("42".to_string())
        );
        assert_eq!(AppRoute::from_path("/properties/"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/properties/42/x"), AppRoute::NotFound);
    }

    #[test]
    fn path_round_trip() {
        for route in [
            AppRoute::Register,
            AppRoute::Dashboard,
            AppRoute::Tasks,
            AppRoute::Users,
            AppRoute::Viewings,
            AppRoute::Calls,
            AppRoute::Property("42".to_string()),
        ] {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn auth_classification() {
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(AppRoute::Property("42".into()).requires_auth());
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::Register.requires_auth());
        assert!(AppRoute::Login.is_auth_entry());
        assert!(AppRoute::Register.is_auth_entry());
        assert!(!AppRoute::Dashboard.is_auth_entry());
    }
}
