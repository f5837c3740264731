//! 注册表单校验

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

pub const MIN_FULLNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_SHAPE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

/// 字段名 -> 错误信息
pub type FieldErrors = BTreeMap<&'static str, String>;

pub fn validate_fullname(fullname: &str) -> Option<String> {
    if fullname.trim().chars().count() < MIN_FULLNAME_LENGTH {
        return Some(format!(
            "Full name must be at least {} characters long",
            MIN_FULLNAME_LENGTH
        ));
    }
    None
}

pub fn validate_email(email: &str) -> Option<String> {
    let valid = EMAIL_SHAPE
        .as_ref()
        .map(|re| re.is_match(email.trim()))
        .unwrap_or(false);
    if !valid {
        return Some("Invalid email format".to_string());
    }
    None
}

/// 至少 8 位，且同时包含小写、大写、数字和特殊字符
pub fn validate_password(password: &str) -> Option<String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if !(has_lower && has_upper && has_digit && has_special) {
        return Some(
            "Password must contain at least one lowercase letter, one uppercase letter, one number and one special character"
                .to_string(),
        );
    }
    None
}

pub fn validate_registration(fullname: &str, email: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(msg) = validate_fullname(fullname) {
        errors.insert("fullname", msg);
    }
    if let Some(msg) = validate_email(email) {
        errors.insert("email", msg);
    }
    if let Some(msg) = validate_password(password) {
        errors.insert("password", msg);
    }
    errors
}
