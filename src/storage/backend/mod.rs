//! SeaORM storage backend
//!
//! Implements the link, event and user stores on SQLite, MySQL/MariaDB and PostgreSQL.

mod connection;
mod converters;
mod events;
mod links;
pub mod retry;
mod users;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::{Result, ShortleakError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(ShortleakError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 唯一约束冲突时返回被违反的列或索引名
///
/// 只取约束标识，不看消息里重复的值（MySQL 会把值写进消息）。
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            Some(violated_constraint(&msg).to_string())
        }
        _ => None,
    }
}

/// - SQLite: `UNIQUE constraint failed: links.short_token` -> `links.short_token`
/// - PostgreSQL: `... violates unique constraint "idx_links_url"` -> `idx_links_url`
/// - MySQL: `Duplicate entry '...' for key 'links.idx_links_url'` -> `links.idx_links_url`
fn violated_constraint(msg: &str) -> &str {
    if let Some(pos) = msg.rfind("for key '") {
        let rest = &msg[pos + "for key '".len()..];
        return rest.split('\'').next().unwrap_or(rest);
    }
    if let Some(pos) = msg.find("unique constraint \"") {
        let rest = &msg[pos + "unique constraint \"".len()..];
        return rest.split('"').next().unwrap_or(rest);
    }
    if let Some(rest) = msg.strip_prefix("UNIQUE constraint failed: ") {
        return rest.trim();
    }
    msg
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig, backend_name: &str) -> Result<Self> {
        let database_url = config.database_url.as_str();
        if database_url.is_empty() {
            return Err(ShortleakError::database_config("database_url 未设置"));
        }

        let db = match backend_name {
            "sqlite" => connect_sqlite(database_url).await?,
            "mysql" | "mariadb" | "postgres" => {
                connect_generic(database_url, backend_name, config.pool_size).await?
            }
            other => {
                return Err(ShortleakError::database_config(format!(
                    "不支持的数据库类型: {}",
                    other
                )));
            }
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config: retry::RetryConfig::from(config),
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
