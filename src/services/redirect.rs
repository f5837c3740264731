//! 跳转流程：解析短码、抓取元数据、记录访问
//!
//! 元数据抓取或访问事件写入任一失败，整个跳转失败，不会返回目标地址。

use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use super::metadata::MetadataFetcher;
use super::visit_logger::VisitLogger;
use crate::errors::{Result, ShortleakError};
use crate::storage::LinkStore;

pub struct RedirectService {
    links: Arc<dyn LinkStore>,
    fetcher: Arc<dyn MetadataFetcher>,
    logger: VisitLogger,
}

impl RedirectService {
    pub fn new(
        links: Arc<dyn LinkStore>,
        fetcher: Arc<dyn MetadataFetcher>,
        logger: VisitLogger,
    ) -> Self {
        Self {
            links,
            fetcher,
            logger,
        }
    }

    /// 返回跳转目标
    pub async fn visit(&self, short_token: &str, visitor_id: Uuid) -> Result<String> {
        let link = match self.links.find_link_by_token(short_token).await? {
            Some(link) if link.active => link,
            _ => return Err(ShortleakError::not_found("Link not found")),
        };

        let metadata = self.fetcher.fetch(&link.url).await.map_err(|e| {
            error!("Metadata fetch for {} failed: {}", link.url, e);
            e
        })?;

        self.logger
            .log_visit(visitor_id, &link.short_token, &metadata)
            .await
            .map_err(|e| {
                error!("Visit log for {} failed: {}", link.short_token, e);
                e
            })?;

        debug!("Redirect {} -> {}", link.short_token, link.url);
        Ok(link.url)
    }
}
