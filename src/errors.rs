use std::fmt;

use actix_web::http::StatusCode;

use crate::utils::validation::FieldErrors;

#[derive(Debug, Clone)]
pub enum ShortleakError {
    Validation(String),
    /// 逐字段的表单校验错误
    InvalidFields {
        message: String,
        fields: FieldErrors,
    },
    InvalidUrl(String),
    NotFound(String),
    Unauthorized(String),
    AlreadyExists(String),
    DuplicateToken(String),
    DuplicateUrl(String),
    TokenExhausted(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    MetadataFetch(String),
    Serialization(String),
    PasswordHash(String),
    TokenIssue(String),
}

impl ShortleakError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortleakError::Validation(_) => "E001",
            ShortleakError::InvalidUrl(_) => "E002",
            ShortleakError::NotFound(_) => "E003",
            ShortleakError::Unauthorized(_) => "E004",
            ShortleakError::AlreadyExists(_) => "E005",
            ShortleakError::DuplicateToken(_) => "E006",
            ShortleakError::DuplicateUrl(_) => "E007",
            ShortleakError::TokenExhausted(_) => "E008",
            ShortleakError::DatabaseConfig(_) => "E009",
            ShortleakError::DatabaseConnection(_) => "E010",
            ShortleakError::DatabaseOperation(_) => "E011",
            ShortleakError::MetadataFetch(_) => "E012",
            ShortleakError::Serialization(_) => "E013",
            ShortleakError::PasswordHash(_) => "E014",
            ShortleakError::TokenIssue(_) => "E015",
            ShortleakError::InvalidFields { .. } => "E016",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortleakError::Validation(_) | ShortleakError::InvalidFields { .. } => {
                "Validation Error"
            }
            ShortleakError::InvalidUrl(_) => "Invalid URL",
            ShortleakError::NotFound(_) => "Resource Not Found",
            ShortleakError::Unauthorized(_) => "Unauthorized",
            ShortleakError::AlreadyExists(_) => "Resource Already Exists",
            ShortleakError::DuplicateToken(_) => "Duplicate Short Token",
            ShortleakError::DuplicateUrl(_) => "Duplicate URL",
            ShortleakError::TokenExhausted(_) => "Short Token Space Exhausted",
            ShortleakError::DatabaseConfig(_) => "Database Configuration Error",
            ShortleakError::DatabaseConnection(_) => "Database Connection Error",
            ShortleakError::DatabaseOperation(_) => "Database Operation Error",
            ShortleakError::MetadataFetch(_) => "Metadata Fetch Error",
            ShortleakError::Serialization(_) => "Serialization Error",
            ShortleakError::PasswordHash(_) => "Password Hash Error",
            ShortleakError::TokenIssue(_) => "Session Token Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortleakError::Validation(msg)
            | ShortleakError::InvalidUrl(msg)
            | ShortleakError::NotFound(msg)
            | ShortleakError::Unauthorized(msg)
            | ShortleakError::AlreadyExists(msg)
            | ShortleakError::DuplicateToken(msg)
            | ShortleakError::DuplicateUrl(msg)
            | ShortleakError::TokenExhausted(msg)
            | ShortleakError::DatabaseConfig(msg)
            | ShortleakError::DatabaseConnection(msg)
            | ShortleakError::DatabaseOperation(msg)
            | ShortleakError::MetadataFetch(msg)
            | ShortleakError::Serialization(msg)
            | ShortleakError::PasswordHash(msg)
            | ShortleakError::TokenIssue(msg) => msg,
            ShortleakError::InvalidFields { message, .. } => message,
        }
    }

    /// 映射为 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            ShortleakError::Validation(_) | ShortleakError::InvalidFields { .. } => {
                StatusCode::BAD_REQUEST
            }
            ShortleakError::InvalidUrl(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ShortleakError::NotFound(_) => StatusCode::NOT_FOUND,
            ShortleakError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ShortleakError::AlreadyExists(_) => StatusCode::CONFLICT,
            // 提交阶段的唯一约束冲突只在分配器内部重试，漏到外层即视为容量问题
            ShortleakError::DuplicateToken(_)
            | ShortleakError::DuplicateUrl(_)
            | ShortleakError::TokenExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            ShortleakError::DatabaseConfig(_)
            | ShortleakError::DatabaseConnection(_)
            | ShortleakError::DatabaseOperation(_)
            | ShortleakError::MetadataFetch(_)
            | ShortleakError::Serialization(_)
            | ShortleakError::PasswordHash(_)
            | ShortleakError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 客户端可见错误（4xx）
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// 表单错误的字段映射
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ShortleakError::InvalidFields { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortleakError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortleakError {}

// 便捷的构造函数
impl ShortleakError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortleakError::Validation(msg.into())
    }

    /// 消息由各字段错误拼接而成
    pub fn invalid_fields(fields: FieldErrors) -> Self {
        let message = fields
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect::<Vec<_>>()
            .join("; ");
        ShortleakError::InvalidFields { message, fields }
    }

    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        ShortleakError::InvalidUrl(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortleakError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        ShortleakError::Unauthorized(msg.into())
    }

    pub fn already_exists<T: Into<String>>(msg: T) -> Self {
        ShortleakError::AlreadyExists(msg.into())
    }

    pub fn duplicate_token<T: Into<String>>(msg: T) -> Self {
        ShortleakError::DuplicateToken(msg.into())
    }

    pub fn duplicate_url<T: Into<String>>(msg: T) -> Self {
        ShortleakError::DuplicateUrl(msg.into())
    }

    pub fn token_exhausted<T: Into<String>>(msg: T) -> Self {
        ShortleakError::TokenExhausted(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortleakError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShortleakError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShortleakError::DatabaseOperation(msg.into())
    }

    pub fn metadata_fetch<T: Into<String>>(msg: T) -> Self {
        ShortleakError::MetadataFetch(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortleakError::Serialization(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        ShortleakError::PasswordHash(msg.into())
    }

    pub fn token_issue<T: Into<String>>(msg: T) -> Self {
        ShortleakError::TokenIssue(msg.into())
    }
}

impl From<sea_orm::DbErr> for ShortleakError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShortleakError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ShortleakError {
    fn from(err: serde_json::Error) -> Self {
        ShortleakError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortleakError>;
