use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::jwt::JwtService;
use crate::api::services::CookieBuilder;
use crate::config::StaticConfig;
use crate::services::{
    AuthService, LinkService, MetadataFetcher, RedirectService, StatsService, VisitLogger,
    build_fetcher,
};
use crate::storage::{EventStore, LinkStore, SeaOrmStorage, StorageFactory, UserStore};

/// 请求处理所需的全部服务，每个 worker 共享同一份
#[derive(Clone)]
pub struct AppContext {
    pub link_service: Arc<LinkService>,
    pub stats_service: Arc<StatsService>,
    pub auth_service: Arc<AuthService>,
    pub redirect_service: Arc<RedirectService>,
    pub jwt: Arc<JwtService>,
    pub cookies: Arc<CookieBuilder>,
}

impl AppContext {
    /// 由存储与元数据抓取器装配服务，测试中可传入替身实现
    pub fn new(
        config: &StaticConfig,
        links: Arc<dyn LinkStore>,
        events: Arc<dyn EventStore>,
        users: Arc<dyn UserStore>,
        fetcher: Arc<dyn MetadataFetcher>,
    ) -> Self {
        let logger = VisitLogger::new(events.clone());

        Self {
            link_service: Arc::new(LinkService::new(
                links.clone(),
                users.clone(),
                &config.links,
            )),
            stats_service: Arc::new(StatsService::new(links.clone(), events)),
            auth_service: Arc::new(AuthService::new(users, logger.clone())),
            redirect_service: Arc::new(RedirectService::new(links, fetcher, logger)),
            jwt: Arc::new(JwtService::from_config(&config.auth)),
            cookies: Arc::new(CookieBuilder::from_config(&config.auth)),
        }
    }
}

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub app: AppContext,
}

/// 准备服务器启动的上下文：连接数据库、执行迁移、装配服务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let fetcher = build_fetcher(&config.metadata).context("Failed to build metadata fetcher")?;

    let app = AppContext::new(
        config,
        storage.clone(),
        storage.clone(),
        storage.clone(),
        fetcher,
    );

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(StartupContext { storage, app })
}
