//! 注册、登录、登出

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{error, info, trace};

use crate::api::jwt::JwtService;
use crate::errors::ShortleakError;
use crate::services::AuthService;
use crate::storage::UserSummary;

use super::error_code::ErrorCode;
use super::helpers::{CookieBuilder, created_response, error_from_shortleak};
use super::types::{ApiResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest};

/// 注册新用户，字段校验失败时由 `error_from_shortleak` 返回逐字段的错误信息
pub async fn register(
    body: web::Json<RegisterRequest>,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    let req = body.into_inner();
    trace!("Auth API: register request for {}", req.email);

    match auth.register(&req.fullname, &req.email, &req.password).await {
        Ok(user) => Ok(created_response(UserSummary::from(&user))),
        Err(e) => Ok(error_from_shortleak(&e)),
    }
}

/// 登录：校验凭据，签发会话令牌并写入 Cookie
pub async fn login(
    body: web::Json<LoginRequest>,
    auth: web::Data<Arc<AuthService>>,
    jwt: web::Data<Arc<JwtService>>,
    cookies: web::Data<Arc<CookieBuilder>>,
) -> ActixResult<impl Responder> {
    let req = body.into_inner();

    let user = match auth.login(&req.email, &req.password).await {
        Ok(user) => user,
        Err(e) => return Ok(error_from_shortleak(&e)),
    };

    let token = match jwt.issue_session_token(user.id) {
        Ok(token) => token,
        Err(e) => {
            error!("Auth API: failed to issue session token: {}", e);
            return Ok(error_from_shortleak(&ShortleakError::token_issue(
                e.to_string(),
            )));
        }
    };

    info!("Auth API: user {} logged in", user.id);
    Ok(HttpResponse::Ok()
        .cookie(cookies.build_session_cookie(token.clone()))
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: ErrorCode::Success as i32,
            message: "Login successful".to_string(),
            data: Some(LoginResponse {
                token,
                user: UserSummary::from(&user),
            }),
        }))
}

/// 登出 - 清除会话 Cookie
pub async fn logout(cookies: web::Data<Arc<CookieBuilder>>) -> ActixResult<impl Responder> {
    trace!("Auth API: logout");

    Ok(HttpResponse::Ok()
        .cookie(cookies.build_expired_session_cookie())
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: ErrorCode::Success as i32,
            message: "OK".to_string(),
            data: Some(MessageResponse {
                message: "Logout successful".to_string(),
            }),
        }))
}
