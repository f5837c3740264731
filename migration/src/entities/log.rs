//! Append-only event log entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// User ID or anonymous visitor ID
    pub actor_id: Uuid,
    /// register / login / create-link / visit-link
    pub action: String,
    /// visit-link 事件中包含 shortToken 字段，统计查询依赖它
    #[sea_orm(column_type = "Json", nullable)]
    pub payload: Option<Json>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
