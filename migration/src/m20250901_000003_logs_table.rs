//! 事件日志表迁移
//!
//! logs 表只追加不修改，记录 register / login / create-link / visit-link 四类事件。
//! actor_id 不设外键：访客 ID 来自 cookie，并不对应 users 表中的行。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Logs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Logs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Logs::ActorId).uuid().not_null())
                    .col(ColumnDef::new(Logs::Action).string_len(32).not_null())
                    .col(ColumnDef::new(Logs::Payload).json().null())
                    .col(
                        ColumnDef::new(Logs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 统计查询按 action 过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_logs_action")
                    .table(Logs::Table)
                    .col(Logs::Action)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_logs_actor_id")
                    .table(Logs::Table)
                    .col(Logs::ActorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_logs_actor_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_logs_action").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Logs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Logs {
    #[sea_orm(iden = "logs")]
    Table,
    Id,
    ActorId,
    Action,
    Payload,
    CreatedAt,
}
