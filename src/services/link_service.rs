//! Link allocation service
//!
//! 给定目标 URL 与所有者，复用已有短码或分配一个新的不冲突短码。
//! 短码检查与插入之间不加锁，并发冲突由数据库唯一索引在提交时裁决。

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::token::TokenGenerator;
use crate::config::LinksConfig;
use crate::errors::{Result, ShortleakError};
use crate::storage::{
    Allocation, EventAction, Link, LinkStore, UserStore, UserSummary, VisitEvent,
};
use crate::utils::{DefaultUrlValidator, UrlValidator};

/// 公开查询返回的链接详情
#[derive(Debug, Clone, Serialize)]
pub struct LinkDetails {
    #[serde(flatten)]
    pub link: Link,
    pub owner: Option<UserSummary>,
}

pub struct LinkService {
    links: Arc<dyn LinkStore>,
    users: Arc<dyn UserStore>,
    generator: Arc<TokenGenerator>,
    validator: Arc<dyn UrlValidator>,
    token_length: usize,
    max_attempts: u32,
}

impl LinkService {
    pub fn new(links: Arc<dyn LinkStore>, users: Arc<dyn UserStore>, config: &LinksConfig) -> Self {
        Self {
            links,
            users,
            generator: Arc::new(TokenGenerator::new()),
            validator: Arc::new(DefaultUrlValidator),
            token_length: config.token_length,
            max_attempts: config.max_allocation_attempts,
        }
    }

    pub fn with_generator(mut self, generator: Arc<TokenGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn UrlValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// 分配短码
    ///
    /// 同一 URL 重复提交返回已有链接（`created = false`）。
    /// 预检冲突与提交时的短码冲突共同计入尝试次数，用尽后返回 `TokenExhausted`。
    pub async fn allocate(&self, url: &str, owner_id: Uuid) -> Result<Allocation> {
        self.validator.validate(url)?;

        if let Some(link) = self.links.find_link_by_url(url).await? {
            debug!("URL already shortened as {}", link.short_token);
            return Ok(Allocation {
                link,
                created: false,
            });
        }

        for attempt in 1..=self.max_attempts {
            let token = self.generator.generate(self.token_length);

            if self.links.token_exists(&token).await? {
                debug!(
                    "Token collision on {} (attempt {}/{})",
                    token, attempt, self.max_attempts
                );
                continue;
            }

            let link = Link::new(owner_id, url, token);
            let event = VisitEvent::new(
                owner_id,
                EventAction::CreateLink,
                Some(serde_json::to_value(&link)?),
            );

            match self.links.insert_link_with_event(&link, &event).await {
                Ok(()) => {
                    info!("Allocated {} for {}", link.short_token, link.url);
                    return Ok(Allocation {
                        link,
                        created: true,
                    });
                }
                Err(ShortleakError::DuplicateToken(msg)) => {
                    warn!(
                        "Token taken at commit (attempt {}/{}): {}",
                        attempt, self.max_attempts, msg
                    );
                }
                Err(ShortleakError::DuplicateUrl(_)) => {
                    // 并发请求先写入了同一 URL，改为返回那一行
                    return match self.links.find_link_by_url(url).await? {
                        Some(link) => Ok(Allocation {
                            link,
                            created: false,
                        }),
                        None => Err(ShortleakError::database_operation(format!(
                            "url '{}' reported as duplicate but not found",
                            url
                        ))),
                    };
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            "Gave up allocating a token for {} after {} attempts",
            url, self.max_attempts
        );
        Err(ShortleakError::token_exhausted(format!(
            "could not find a free short token after {} attempts",
            self.max_attempts
        )))
    }

    /// 公开查询，附带所有者信息
    pub async fn get_link(&self, short_token: &str) -> Result<LinkDetails> {
        let link = self
            .links
            .find_link_by_token(short_token)
            .await?
            .ok_or_else(|| ShortleakError::not_found("Link not found"))?;

        let owner = self
            .users
            .find_user_by_id(link.owner_id)
            .await?
            .map(|user| UserSummary::from(&user));

        Ok(LinkDetails { link, owner })
    }

    pub async fn list_links_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>> {
        self.links.list_links_by_owner(owner_id).await
    }

    /// 查询调用者自己的链接，不存在或不属于调用者均返回 NotFound
    pub async fn find_owned_link(&self, short_token: &str, owner_id: Uuid) -> Result<Link> {
        match self.links.find_link_by_token(short_token).await? {
            Some(link) if link.owner_id == owner_id => Ok(link),
            _ => Err(ShortleakError::not_found("Link not found")),
        }
    }

    pub async fn delete_link(&self, short_token: &str, owner_id: Uuid) -> Result<()> {
        let link = self.find_owned_link(short_token, owner_id).await?;

        if !self.links.delete_link(&link.short_token).await? {
            return Err(ShortleakError::not_found("Link not found"));
        }
        Ok(())
    }
}
