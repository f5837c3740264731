//! API 帮助函数

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

use crate::config::AuthConfig;
use crate::errors::ShortleakError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 ShortleakError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 服务端错误只返回类型名，细节写日志。
pub fn error_from_shortleak(err: &ShortleakError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err);
    if let Some(fields) = err.field_errors() {
        return json_response(status, error_code, "Validation failed", Some(fields));
    }
    if err.is_client_error() {
        error_response(status, error_code, err.message())
    } else {
        error!("Request failed: {}", err);
        error_response(status, error_code, err.error_type())
    }
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(result: Result<T, ShortleakError>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_shortleak(&e),
    }
}

impl ResponseError for ShortleakError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        error_from_shortleak(self)
    }
}

/// Cookie 构建器
#[derive(Debug, Clone)]
pub struct CookieBuilder {
    same_site: SameSite,
    secure: bool,
    session_cookie: String,
    visitor_cookie: String,
    token_hours: u64,
    visitor_cookie_days: i64,
}

impl CookieBuilder {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            same_site: config.cookie_same_site.into(),
            secure: config.cookie_secure,
            session_cookie: config.session_cookie.clone(),
            visitor_cookie: config.visitor_cookie.clone(),
            token_hours: config.token_hours,
            visitor_cookie_days: config.visitor_cookie_days,
        }
    }

    fn build_cookie_base(
        &self,
        name: &str,
        value: String,
        max_age: CookieDuration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(name.to_string(), value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(max_age);
        cookie
    }

    pub fn build_session_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            &self.session_cookie,
            token,
            CookieDuration::hours(self.token_hours as i64),
        )
    }

    pub fn build_expired_session_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(&self.session_cookie, String::new(), CookieDuration::ZERO)
    }

    pub fn build_visitor_cookie(&self, visitor_id: &uuid::Uuid) -> Cookie<'static> {
        self.build_cookie_base(
            &self.visitor_cookie,
            visitor_id.to_string(),
            CookieDuration::days(self.visitor_cookie_days),
        )
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie
    }

    pub fn visitor_cookie_name(&self) -> &str {
        &self.visitor_cookie
    }
}
