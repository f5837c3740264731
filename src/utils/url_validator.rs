//! URL 验证模块
//!
//! 短链接目标只接受 `http(s)://host[:port][/path]` 形式的 URL。
//! 验证逻辑以 trait 注入到分配器中，测试可替换实现。

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::errors::ShortleakError;

/// links.url 列宽
pub const MAX_URL_LENGTH: usize = 768;

static URL_SHAPE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^(http|https)://[a-zA-Z0-9.-]+(:[0-9]+)?(/.*)?$"));

/// URL 验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    TooLong(usize),
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL is required"),
            Self::TooLong(len) => write!(
                f,
                "URL is too long: {} characters (max {})",
                len, MAX_URL_LENGTH
            ),
            Self::DangerousProtocol(proto) => write!(f, "Dangerous protocol blocked: {}", proto),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

impl From<UrlValidationError> for ShortleakError {
    fn from(err: UrlValidationError) -> Self {
        match err {
            UrlValidationError::EmptyUrl => ShortleakError::validation(err.to_string()),
            _ => ShortleakError::invalid_url(err.to_string()),
        }
    }
}

const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 目标 URL 校验能力
pub trait UrlValidator: Send + Sync {
    fn validate(&self, url: &str) -> Result<(), UrlValidationError>;
}

/// 生产环境使用的校验器
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUrlValidator;

impl UrlValidator for DefaultUrlValidator {
    fn validate(&self, url: &str) -> Result<(), UrlValidationError> {
        validate_url(url)
    }
}

/// 验证 URL
///
/// 1. 非空
/// 2. 长度不超过列宽
/// 3. 不是危险协议
/// 4. 满足 scheme://host[:port][/path] 形状
/// 5. 能被 `Url::parse` 解析
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    if url.trim().is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong(url.len()));
    }

    let lower = url.to_lowercase();
    if let Some(proto) = DANGEROUS_PROTOCOLS.iter().find(|p| lower.starts_with(**p)) {
        return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
    }

    let shape = URL_SHAPE
        .as_ref()
        .map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    if !shape.is_match(url) {
        return Err(UrlValidationError::InvalidFormat(
            "expected http(s)://host[:port][/path]".to_string(),
        ));
    }

    Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    Ok(())
}
