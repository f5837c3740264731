//! links 表迁移
//!
//! url 与 short_token 各自带唯一索引，并发分配时由数据库在提交阶段裁决冲突。

use sea_orm_migration::prelude::*;

use super::m20250901_000001_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Links::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Links::UserId).uuid().not_null())
                    // MySQL 唯一索引上限 3072 字节，utf8mb4 下即 768 字符
                    .col(ColumnDef::new(Links::Url).string_len(768).not_null())
                    .col(ColumnDef::new(Links::ShortToken).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Links::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Links::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_links_user_id")
                            .from(Links::Table, Links::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_url")
                    .table(Links::Table)
                    .col(Links::Url)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_short_token")
                    .table(Links::Table)
                    .col(Links::ShortToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 按用户列出链接
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_user_id")
                    .table(Links::Table)
                    .col(Links::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_links_user_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_links_short_token").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_links_url").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Links {
    #[sea_orm(iden = "links")]
    Table,
    Id,
    UserId,
    Url,
    ShortToken,
    Active,
    CreatedAt,
}
