//! EventStore implementation
//!
//! 访问统计在每次查询时从事件日志重新聚合，不维护计数器。

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, sea_query::Expr,
};
use tracing::trace;

use super::converters::event_to_active_model;
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, ShortleakError};
use crate::storage::models::{EventAction, VisitEvent, VisitStats};
use crate::storage::traits::EventStore;

use migration::entities::log;

/// `payload.shortToken = ?`，各数据库的 JSON 取值语法不同
fn payload_token_eq(backend: DbBackend, short_token: &str) -> Expr {
    match backend {
        DbBackend::Sqlite => Expr::cust_with_values(
            "json_extract(payload, '$.shortToken') = ?",
            [short_token],
        ),
        DbBackend::MySql => Expr::cust_with_values(
            "JSON_UNQUOTE(JSON_EXTRACT(payload, '$.shortToken')) = ?",
            [short_token],
        ),
        // Postgres
        _ => Expr::cust_with_values("payload->>'shortToken' = ?", [short_token]),
    }
}

#[async_trait]
impl EventStore for SeaOrmStorage {
    async fn append_event(&self, event: &VisitEvent) -> Result<()> {
        let db = &self.db;
        retry::with_retry(
            &format!("append_event({})", event.action),
            self.retry_config,
            || async {
                log::Entity::insert(event_to_active_model(event))
                    .exec_without_returning(db)
                    .await
            },
        )
        .await
        .map_err(|e| ShortleakError::database_operation(format!("写入事件日志失败: {}", e)))?;

        trace!("Event appended: {} by {}", event.action, event.actor_id);
        Ok(())
    }

    async fn visit_stats(&self, short_token: &str) -> Result<VisitStats> {
        let db = &self.db;
        let backend = db.get_database_backend();

        let (total, unique) = retry::with_retry(
            &format!("visit_stats({})", short_token),
            self.retry_config,
            || async {
                let total = log::Entity::find()
                    .filter(log::Column::Action.eq(EventAction::VisitLink.as_str()))
                    .filter(payload_token_eq(backend, short_token))
                    .count(db)
                    .await?;

                let unique = log::Entity::find()
                    .select_only()
                    .column_as(Expr::cust("COUNT(DISTINCT actor_id)"), "unique_visitors")
                    .filter(log::Column::Action.eq(EventAction::VisitLink.as_str()))
                    .filter(payload_token_eq(backend, short_token))
                    .into_tuple::<i64>()
                    .one(db)
                    .await?
                    .unwrap_or(0);

                Ok((total, unique))
            },
        )
        .await
        .map_err(|e| ShortleakError::database_operation(format!("统计访问数据失败: {}", e)))?;

        Ok(VisitStats {
            total_visits: total,
            unique_visitors: unique.max(0) as u64,
        })
    }
}
