//! 存储接口
//!
//! 服务层只依赖这些 trait，生产环境由 `SeaOrmStorage` 实现，测试中可替换为内存实现。

use async_trait::async_trait;
use uuid::Uuid;

use super::models::{Link, User, VisitEvent, VisitStats};
use crate::errors::Result;

#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn find_link_by_url(&self, url: &str) -> Result<Option<Link>>;

    async fn find_link_by_token(&self, short_token: &str) -> Result<Option<Link>>;

    async fn token_exists(&self, short_token: &str) -> Result<bool>;

    /// 在同一事务中写入链接和 create-link 事件
    ///
    /// 唯一约束冲突分别报告为 `DuplicateToken` / `DuplicateUrl`。
    async fn insert_link_with_event(&self, link: &Link, event: &VisitEvent) -> Result<()>;

    /// 按创建时间倒序
    async fn list_links_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>>;

    /// 返回是否删除了一行
    async fn delete_link(&self, short_token: &str) -> Result<bool>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn append_event(&self, event: &VisitEvent) -> Result<()>;

    /// 聚合指定短码的 visit-link 事件：总数与不同 actor 数
    async fn visit_stats(&self, short_token: &str) -> Result<VisitStats>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// 在同一事务中写入用户和 register 事件，邮箱重复时返回 `AlreadyExists`
    async fn insert_user_with_event(&self, user: &User, event: &VisitEvent) -> Result<()>;
}
