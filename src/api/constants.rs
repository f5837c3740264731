//! API 模块常量定义

/// 响应头中的请求 ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Authorization 头前缀
pub const BEARER_PREFIX: &str = "Bearer ";

/// 认证失败统一消息，不区分具体原因
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// 短码路径段的最大长度，超出直接 404
pub const MAX_TOKEN_PATH_LENGTH: usize = 32;
