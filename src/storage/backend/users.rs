//! UserStore implementation

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use super::converters::{event_to_active_model, model_to_user, user_to_active_model};
use super::{SeaOrmStorage, retry, unique_violation};
use crate::errors::{Result, ShortleakError};
use crate::storage::models::{User, VisitEvent};
use crate::storage::traits::UserStore;

use migration::entities::{log, user};

#[async_trait]
impl UserStore for SeaOrmStorage {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let db = &self.db;
        let model = retry::with_retry("find_user_by_email", self.retry_config, || async {
            user::Entity::find()
                .filter(user::Column::Email.eq(email))
                .one(db)
                .await
        })
        .await
        .map_err(|e| ShortleakError::database_operation(format!("查询用户失败: {}", e)))?;

        Ok(model.map(model_to_user))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let db = &self.db;
        let model = retry::with_retry(
            &format!("find_user_by_id({})", id),
            self.retry_config,
            || async { user::Entity::find_by_id(id).one(db).await },
        )
        .await
        .map_err(|e| ShortleakError::database_operation(format!("查询用户失败: {}", e)))?;

        Ok(model.map(model_to_user))
    }

    async fn insert_user_with_event(&self, user: &User, event: &VisitEvent) -> Result<()> {
        let db = &self.db;

        retry::with_retry("insert_user", self.retry_config, || async {
            let txn = db.begin().await?;
            user::Entity::insert(user_to_active_model(user))
                .exec_without_returning(&txn)
                .await?;
            log::Entity::insert(event_to_active_model(event))
                .exec_without_returning(&txn)
                .await?;
            txn.commit().await
        })
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(target) if target.ends_with("email") => {
                ShortleakError::already_exists("User already exists")
            }
            _ => ShortleakError::database_operation(format!("写入用户失败: {}", e)),
        })?;

        info!("User registered: {}", user.id);
        Ok(())
    }
}
