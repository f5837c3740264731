//! 会话认证中间件
//!
//! 依次从会话 Cookie 与 `Authorization: Bearer` 中取 JWT，校验后加载用户并放入
//! request extensions。任何一步失败都返回相同的 401，不暴露失败原因。

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::header::{AUTHORIZATION, CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::api::constants;
use crate::api::jwt::JwtService;
use crate::api::services::{ApiResponse, ErrorCode, error_from_shortleak};
use crate::errors::ShortleakError;
use crate::services::AuthService;
use crate::storage::User;

/// 当前登录用户，由 `SessionAuth` 写入 extensions
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthUser>().cloned();
        ready(user.ok_or_else(|| {
            ShortleakError::unauthorized(constants::UNAUTHORIZED_MESSAGE).into()
        }))
    }
}

/// Session authentication middleware
#[derive(Clone)]
pub struct SessionAuth {
    jwt: Arc<JwtService>,
    auth: Arc<AuthService>,
    cookie_name: Rc<str>,
}

impl SessionAuth {
    pub fn new(jwt: Arc<JwtService>, auth: Arc<AuthService>, cookie_name: &str) -> Self {
        Self {
            jwt,
            auth,
            cookie_name: Rc::from(cookie_name),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            jwt: self.jwt.clone(),
            auth: self.auth.clone(),
            cookie_name: self.cookie_name.clone(),
        }))
    }
}

pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    jwt: Arc<JwtService>,
    auth: Arc<AuthService>,
    cookie_name: Rc<str>,
}

impl<S, B> SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: constants::UNAUTHORIZED_MESSAGE.to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    fn handle_error(req: ServiceRequest, err: &ShortleakError) -> ServiceResponse<EitherBody<B>> {
        req.into_response(error_from_shortleak(err).map_into_right_body())
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix(constants::BEARER_PREFIX))
            .map(|s| s.trim().to_string())
    }

    /// Cookie 优先，其次 Bearer
    fn extract_token(req: &ServiceRequest, cookie_name: &str) -> Option<String> {
        req.cookie(cookie_name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| Self::extract_bearer_token(req))
    }
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let jwt = self.jwt.clone();
        let auth = self.auth.clone();
        let cookie_name = self.cookie_name.clone();

        Box::pin(async move {
            let Some(token) = Self::extract_token(&req, &cookie_name) else {
                debug!("No session token on request");
                return Ok(Self::handle_unauthorized(req));
            };

            let user_id = match jwt.validate_session_token(&token) {
                Ok(claims) => claims.user_id(),
                Err(e) => {
                    info!("Session token validation failed: {}", e);
                    None
                }
            };
            let Some(user_id) = user_id else {
                return Ok(Self::handle_unauthorized(req));
            };

            match auth.active_user(user_id).await {
                Ok(Some(user)) => {
                    trace!("Session authenticated for user {}", user.id);
                    req.extensions_mut().insert(AuthUser(user));
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                Ok(None) => {
                    info!("Session user {} no longer active", user_id);
                    Ok(Self::handle_unauthorized(req))
                }
                Err(e) => Ok(Self::handle_error(req, &e)),
            }
        })
    }
}
