//! 构建期配置
//!
//! 后端基址通过环境变量在编译时注入（`PROPCRM_API_URL`），
//! 未提供时回退到本地开发端点。

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// 获取后端 API 基址（去除末尾斜杠）
pub fn api_base_url() -> String {
    option_env!("PROPCRM_API_URL")
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_has_no_trailing_slash() {
        assert!(!api_base_url().ends_with('/'));
    }
}
