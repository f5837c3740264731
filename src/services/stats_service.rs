//! Visit statistics
//!
//! 每次查询都从事件日志重新聚合。链接不存在才是错误，没有访问记录时返回 (0, 0)。

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::{Result, ShortleakError};
use crate::storage::{EventStore, Link, LinkStore, VisitStats};

#[derive(Debug, Clone, Serialize)]
pub struct LinkStats {
    pub link: Link,
    pub total_visits: u64,
    pub unique_visitors: u64,
}

pub struct StatsService {
    links: Arc<dyn LinkStore>,
    events: Arc<dyn EventStore>,
}

impl StatsService {
    pub fn new(links: Arc<dyn LinkStore>, events: Arc<dyn EventStore>) -> Self {
        Self { links, events }
    }

    pub async fn stats(&self, short_token: &str) -> Result<VisitStats> {
        if self.links.find_link_by_token(short_token).await?.is_none() {
            return Err(ShortleakError::not_found("Link not found"));
        }
        self.events.visit_stats(short_token).await
    }

    /// 只有链接所有者可以查看统计
    pub async fn stats_for_owner(&self, short_token: &str, owner_id: Uuid) -> Result<LinkStats> {
        let link = match self.links.find_link_by_token(short_token).await? {
            Some(link) if link.owner_id == owner_id => link,
            _ => return Err(ShortleakError::not_found("Link not found")),
        };

        let stats = self.events.visit_stats(&link.short_token).await?;
        Ok(LinkStats {
            link,
            total_visits: stats.total_visits,
            unique_visitors: stats.unique_visitors,
        })
    }
}
