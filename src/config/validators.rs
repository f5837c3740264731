//! 配置值验证
//!
//! 启动前检查会导致运行期异常的配置组合。

use super::StaticConfig;

/// 62 个字符下，3 位以下的短码空间过小，分配几乎必然耗尽
pub const MIN_TOKEN_LENGTH: usize = 3;
pub const MAX_TOKEN_LENGTH: usize = 32;
/// 会话最长一年
pub const MAX_TOKEN_HOURS: u64 = 24 * 365;
/// 访客 cookie 最长十年
pub const MAX_VISITOR_COOKIE_DAYS: i64 = 3650;

pub fn validate_config(config: &StaticConfig) -> Result<(), String> {
    let links = &config.links;
    if !(MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH).contains(&links.token_length) {
        return Err(format!(
            "links.token_length must be between {} and {}, got {}",
            MIN_TOKEN_LENGTH, MAX_TOKEN_LENGTH, links.token_length
        ));
    }
    if links.max_allocation_attempts == 0 {
        return Err("links.max_allocation_attempts must be at least 1".to_string());
    }

    let auth = &config.auth;
    if !(1..=MAX_TOKEN_HOURS).contains(&auth.token_hours) {
        return Err(format!(
            "auth.token_hours must be between 1 and {}, got {}",
            MAX_TOKEN_HOURS, auth.token_hours
        ));
    }
    if !(1..=MAX_VISITOR_COOKIE_DAYS).contains(&auth.visitor_cookie_days) {
        return Err(format!(
            "auth.visitor_cookie_days must be between 1 and {}, got {}",
            MAX_VISITOR_COOKIE_DAYS, auth.visitor_cookie_days
        ));
    }
    if auth.session_cookie.trim().is_empty() || auth.visitor_cookie.trim().is_empty() {
        return Err("auth.session_cookie and auth.visitor_cookie must not be empty".to_string());
    }
    if auth.session_cookie == auth.visitor_cookie {
        return Err("auth.session_cookie and auth.visitor_cookie must differ".to_string());
    }

    match config.logging.format.as_str() {
        "text" | "json" => {}
        other => {
            return Err(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                other
            ));
        }
    }

    if config.metadata.enabled && config.metadata.timeout_secs == 0 {
        return Err("metadata.timeout_secs must be at least 1 when metadata is enabled".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&StaticConfig::default()).is_ok());
    }

    #[test]
    fn test_token_length_bounds() {
        let mut config = StaticConfig::default();
        config.links.token_length = 2;
        assert!(validate_config(&config).is_err());
        config.links.token_length = 33;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = StaticConfig::default();
        config.links.max_allocation_attempts = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_session_and_cookie_lifetime_bounds() {
        let mut config = StaticConfig::default();
        config.auth.token_hours = 0;
        assert!(validate_config(&config).is_err());
        config.auth.token_hours = u64::MAX;
        assert!(validate_config(&config).is_err());
        config.auth.token_hours = MAX_TOKEN_HOURS;
        assert!(validate_config(&config).is_ok());

        config.auth.visitor_cookie_days = -1;
        assert!(validate_config(&config).is_err());
        config.auth.visitor_cookie_days = i64::MAX;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_cookie_names_must_differ() {
        let mut config = StaticConfig::default();
        config.auth.visitor_cookie = config.auth.session_cookie.clone();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = StaticConfig::default();
        config.logging.format = "xml".to_string();
        assert!(validate_config(&config).is_err());
    }
}
