//! 链接创建、查询、删除与统计

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::api::middleware::AuthUser;
use crate::errors::ShortleakError;
use crate::services::{LinkService, StatsService};

use super::helpers::{api_result, created_response, error_from_shortleak, success_response};
use super::types::{MessageResponse, ShortenRequest, ShortenResponse};

/// 创建短链接；同一 URL 重复提交返回已有短码（200），新建返回 201
pub async fn shorten(
    user: AuthUser,
    body: web::Json<ShortenRequest>,
    links: web::Data<Arc<LinkService>>,
) -> ActixResult<impl Responder> {
    let Some(url) = body.into_inner().url.filter(|u| !u.trim().is_empty()) else {
        return Ok(error_from_shortleak(&ShortleakError::validation(
            "url is required",
        )));
    };

    let response = match links.allocate(url.trim(), user.0.id).await {
        Ok(allocation) => {
            let body = ShortenResponse {
                short_token: allocation.link.short_token,
                created: allocation.created,
            };
            if allocation.created {
                info!("Link API: user {} created {}", user.0.id, body.short_token);
                created_response(body)
            } else {
                success_response(body)
            }
        }
        Err(e) => error_from_shortleak(&e),
    };
    Ok(response)
}

/// 公开查询单个链接（附带创建者信息）
pub async fn get_link(
    path: web::Path<String>,
    links: web::Data<Arc<LinkService>>,
) -> ActixResult<impl Responder> {
    let token = path.into_inner();
    trace!("Link API: lookup {}", token);
    Ok(api_result(links.get_link(&token).await))
}

/// 当前用户的全部链接，新建的在前
pub async fn list_user_links(
    user: AuthUser,
    links: web::Data<Arc<LinkService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(links.list_links_by_owner(user.0.id).await))
}

pub async fn delete_link(
    user: AuthUser,
    path: web::Path<String>,
    links: web::Data<Arc<LinkService>>,
) -> ActixResult<HttpResponse> {
    let token = path.into_inner();
    links.delete_link(&token, user.0.id).await?;
    Ok(success_response(MessageResponse {
        message: format!("Link '{}' deleted", token),
    }))
}

/// 访问统计：总访问数与独立访客数
pub async fn get_stats(
    user: AuthUser,
    path: web::Path<String>,
    stats: web::Data<Arc<StatsService>>,
) -> ActixResult<impl Responder> {
    let token = path.into_inner();
    Ok(api_result(stats.stats_for_owner(&token, user.0.id).await))
}
