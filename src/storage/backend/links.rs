//! LinkStore implementation

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::converters::{event_to_active_model, link_to_active_model, model_to_link};
use super::{SeaOrmStorage, retry, unique_violation};
use crate::errors::{Result, ShortleakError};
use crate::storage::models::{Link, VisitEvent};
use crate::storage::traits::LinkStore;

use migration::entities::{link, log};

/// 把提交阶段的唯一约束冲突区分为短码冲突或 URL 冲突
fn map_insert_error(err: DbErr, link: &Link) -> ShortleakError {
    match unique_violation(&err) {
        Some(target) if target.ends_with("short_token") => ShortleakError::duplicate_token(
            format!("short token '{}' already taken", link.short_token),
        ),
        Some(target) if target.ends_with("url") => {
            ShortleakError::duplicate_url(format!("url '{}' already shortened", link.url))
        }
        _ => ShortleakError::database_operation(format!("写入短链接失败: {}", err)),
    }
}

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn find_link_by_url(&self, url: &str) -> Result<Option<Link>> {
        let db = &self.db;
        let model = retry::with_retry("find_link_by_url", self.retry_config, || async {
            link::Entity::find()
                .filter(link::Column::Url.eq(url))
                .one(db)
                .await
        })
        .await
        .map_err(|e| ShortleakError::database_operation(format!("按 URL 查询短链接失败: {}", e)))?;

        Ok(model.map(model_to_link))
    }

    async fn find_link_by_token(&self, short_token: &str) -> Result<Option<Link>> {
        let db = &self.db;
        let model = retry::with_retry(
            &format!("find_link_by_token({})", short_token),
            self.retry_config,
            || async {
                link::Entity::find()
                    .filter(link::Column::ShortToken.eq(short_token))
                    .one(db)
                    .await
            },
        )
        .await
        .map_err(|e| ShortleakError::database_operation(format!("查询短链接失败: {}", e)))?;

        Ok(model.map(model_to_link))
    }

    async fn token_exists(&self, short_token: &str) -> Result<bool> {
        let db = &self.db;
        let count = retry::with_retry(
            &format!("token_exists({})", short_token),
            self.retry_config,
            || async {
                link::Entity::find()
                    .filter(link::Column::ShortToken.eq(short_token))
                    .count(db)
                    .await
            },
        )
        .await
        .map_err(|e| ShortleakError::database_operation(format!("检查短码失败: {}", e)))?;

        Ok(count > 0)
    }

    async fn insert_link_with_event(&self, link: &Link, event: &VisitEvent) -> Result<()> {
        let db = &self.db;

        retry::with_retry(
            &format!("insert_link({})", link.short_token),
            self.retry_config,
            || async {
                let txn = db.begin().await?;
                link::Entity::insert(link_to_active_model(link))
                    .exec_without_returning(&txn)
                    .await?;
                log::Entity::insert(event_to_active_model(event))
                    .exec_without_returning(&txn)
                    .await?;
                txn.commit().await
            },
        )
        .await
        .map_err(|e| map_insert_error(e, link))?;

        info!(
            "Short link created: {} -> {} (owner {})",
            link.short_token, link.url, link.owner_id
        );
        Ok(())
    }

    async fn list_links_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>> {
        let db = &self.db;
        let models = retry::with_retry(
            &format!("list_links_by_owner({})", owner_id),
            self.retry_config,
            || async {
                link::Entity::find()
                    .filter(link::Column::UserId.eq(owner_id))
                    .order_by_desc(link::Column::CreatedAt)
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| ShortleakError::database_operation(format!("查询用户短链接失败: {}", e)))?;

        debug!("Loaded {} links for owner {}", models.len(), owner_id);
        Ok(models.into_iter().map(model_to_link).collect())
    }

    async fn delete_link(&self, short_token: &str) -> Result<bool> {
        let db = &self.db;
        let result = retry::with_retry(
            &format!("delete_link({})", short_token),
            self.retry_config,
            || async {
                link::Entity::delete_many()
                    .filter(link::Column::ShortToken.eq(short_token))
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| ShortleakError::database_operation(format!("删除短链接失败: {}", e)))?;

        if result.rows_affected > 0 {
            info!("Short link deleted: {}", short_token);
        }
        Ok(result.rows_affected > 0)
    }
}
