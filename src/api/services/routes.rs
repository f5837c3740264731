//! 路由配置
//!
//! - `/api/auth`: register / login / logout
//! - `/shorten`、`/api/links`、`/stats`: 链接接口
//! - `/{token}`: 公开跳转，必须最后注册

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::web;

use crate::api::middleware::{SessionAuth, VisitorIdentity};
use crate::runtime::lifetime::AppContext;

use super::auth::{login, logout, register};
use super::error_code::ErrorCode;
use super::helpers::error_response;
use super::links::{delete_link, get_link, get_stats, list_user_links, shorten};
use super::redirect::handle_redirect;

/// 请求体解析失败也走统一的 JSON 包装
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(
            err,
            error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message),
        )
        .into()
    })
}

/// 认证路由 `/api/auth`
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/api/auth")
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout))
}

/// 链接路由 `/api/links`
///
/// - GET /api/links/user - 当前用户的链接（需认证，必须在 /{token} 之前）
/// - GET /api/links/{token} - 公开查询
/// - DELETE /api/links/{token} - 删除（需认证）
pub fn links_routes(session: SessionAuth) -> actix_web::Scope {
    web::scope("/api/links")
        .route(
            "/user",
            web::get().to(list_user_links).wrap(session.clone()),
        )
        .route("/{token}", web::get().to(get_link))
        .route("/{token}", web::delete().to(delete_link).wrap(session))
}

/// 注册全部 app_data 与路由
pub fn configure_app(cfg: &mut web::ServiceConfig, ctx: &AppContext) {
    let session = SessionAuth::new(
        ctx.jwt.clone(),
        ctx.auth_service.clone(),
        ctx.cookies.session_cookie_name(),
    );
    let visitor = VisitorIdentity::new(ctx.cookies.clone());

    cfg.app_data(json_config())
        .app_data(web::Data::new(ctx.link_service.clone()))
        .app_data(web::Data::new(ctx.stats_service.clone()))
        .app_data(web::Data::new(ctx.auth_service.clone()))
        .app_data(web::Data::new(ctx.redirect_service.clone()))
        .app_data(web::Data::new(ctx.jwt.clone()))
        .app_data(web::Data::new(ctx.cookies.clone()))
        .service(auth_routes())
        .service(links_routes(session.clone()))
        .route("/shorten", web::post().to(shorten).wrap(session.clone()))
        .route("/stats/{token}", web::get().to(get_stats).wrap(session))
        .route("/{token}", web::get().to(handle_redirect).wrap(visitor));
}
