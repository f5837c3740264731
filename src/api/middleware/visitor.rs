//! 访客标识中间件
//!
//! 为匿名访客维持一个长期 UUID Cookie，供访问日志区分独立访客。

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{trace, warn};
use uuid::Uuid;

use crate::api::services::CookieBuilder;

/// 当前请求的访客 ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisitorId(pub Uuid);

impl FromRequest for VisitorId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    /// 未经过中间件的路由拿到一次性的匿名 ID
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let id = req
            .extensions()
            .get::<VisitorId>()
            .copied()
            .unwrap_or_else(|| VisitorId(Uuid::new_v4()));
        ready(Ok(id))
    }
}

#[derive(Clone)]
pub struct VisitorIdentity {
    cookies: Arc<CookieBuilder>,
}

impl VisitorIdentity {
    pub fn new(cookies: Arc<CookieBuilder>) -> Self {
        Self { cookies }
    }
}

impl<S, B> Transform<S, ServiceRequest> for VisitorIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = VisitorIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(VisitorIdentityMiddleware {
            service: Rc::new(service),
            cookies: self.cookies.clone(),
        }))
    }
}

pub struct VisitorIdentityMiddleware<S> {
    service: Rc<S>,
    cookies: Arc<CookieBuilder>,
}

impl<S, B> Service<ServiceRequest> for VisitorIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
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
        let cookies = self.cookies.clone();

        let existing = req
            .cookie(cookies.visitor_cookie_name())
            .and_then(|c| Uuid::parse_str(c.value()).ok());

        let (visitor_id, is_new) = match existing {
            Some(id) => (id, false),
            None => (Uuid::new_v4(), true),
        };
        req.extensions_mut().insert(VisitorId(visitor_id));

        Box::pin(async move {
            let mut response = srv.call(req).await?;

            if is_new {
                trace!("Assigning new visitor id {}", visitor_id);
                let cookie = cookies.build_visitor_cookie(&visitor_id);
                if let Err(e) = response.response_mut().add_cookie(&cookie) {
                    warn!("Failed to set visitor cookie: {}", e);
                }
            }

            Ok(response)
        })
    }
}
