//! 公开跳转 `GET /{token}`

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, web};
use std::sync::Arc;
use tracing::trace;

use crate::api::constants::MAX_TOKEN_PATH_LENGTH;
use crate::api::middleware::VisitorId;
use crate::errors::ShortleakError;
use crate::services::RedirectService;
use crate::services::token::is_token_shaped;

use super::helpers::error_from_shortleak;

pub async fn handle_redirect(
    path: web::Path<String>,
    visitor: VisitorId,
    redirect: web::Data<Arc<RedirectService>>,
) -> HttpResponse {
    let token = path.into_inner();

    // 非法短码直接 404，不查库
    if token.len() > MAX_TOKEN_PATH_LENGTH || !is_token_shaped(&token) {
        trace!("Invalid short token rejected: {}", token);
        return error_from_shortleak(&ShortleakError::not_found("Link not found"));
    }

    match redirect.visit(&token, visitor.0).await {
        Ok(url) => HttpResponse::Found()
            .insert_header((LOCATION, url))
            .finish(),
        Err(e) => error_from_shortleak(&e),
    }
}
