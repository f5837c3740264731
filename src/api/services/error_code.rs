//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::ShortleakError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    UserAlreadyExists = 2001,
    ValidationFailed = 2002,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkAlreadyExists = 3001,
    LinkInvalidUrl = 3002,
    LinkTokenExhausted = 3003,
    MetadataFetchFailed = 3004,
}

impl From<&ShortleakError> for ErrorCode {
    fn from(err: &ShortleakError) -> Self {
        match err {
            ShortleakError::Validation(_) => ErrorCode::BadRequest,
            ShortleakError::InvalidFields { .. } => ErrorCode::ValidationFailed,
            ShortleakError::InvalidUrl(_) => ErrorCode::LinkInvalidUrl,
            ShortleakError::NotFound(_) => ErrorCode::NotFound,
            ShortleakError::Unauthorized(_) => ErrorCode::Unauthorized,
            ShortleakError::AlreadyExists(_) => ErrorCode::UserAlreadyExists,
            ShortleakError::DuplicateToken(_) | ShortleakError::DuplicateUrl(_) => {
                ErrorCode::LinkAlreadyExists
            }
            ShortleakError::TokenExhausted(_) => ErrorCode::LinkTokenExhausted,
            ShortleakError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            ShortleakError::MetadataFetch(_) => ErrorCode::MetadataFetchFailed,
            ShortleakError::DatabaseConfig(_)
            | ShortleakError::DatabaseOperation(_)
            | ShortleakError::Serialization(_)
            | ShortleakError::PasswordHash(_)
            | ShortleakError::TokenIssue(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::LinkInvalidUrl).unwrap(),
            "3002"
        );
        let code: ErrorCode = serde_json::from_str("1001").unwrap();
        assert_eq!(code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_from_error() {
        assert_eq!(
            ErrorCode::from(&ShortleakError::invalid_url("bad")),
            ErrorCode::LinkInvalidUrl
        );
        assert_eq!(
            ErrorCode::from(&ShortleakError::token_exhausted("full")),
            ErrorCode::LinkTokenExhausted
        );
        assert_eq!(
            ErrorCode::from(&ShortleakError::database_operation("boom")),
            ErrorCode::InternalServerError
        );
    }
}
