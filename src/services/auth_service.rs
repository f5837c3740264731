//! 注册与登录

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::visit_logger::VisitLogger;
use crate::errors::{Result, ShortleakError};
use crate::storage::{EventAction, User, UserStore, VisitEvent};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::validate_registration;

/// 登录失败统一返回，不区分邮箱不存在与密码错误
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService {
    users: Arc<dyn UserStore>,
    logger: VisitLogger,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, logger: VisitLogger) -> Self {
        Self { users, logger }
    }

    /// 注册新用户，用户行和 register 事件在同一事务中写入
    pub async fn register(&self, fullname: &str, email: &str, password: &str) -> Result<User> {
        let errors = validate_registration(fullname, email, password);
        if !errors.is_empty() {
            return Err(ShortleakError::invalid_fields(errors));
        }

        let email = normalize_email(email);
        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(ShortleakError::already_exists("User already exists"));
        }

        let user = User {
            id: Uuid::new_v4(),
            fullname: fullname.trim().to_string(),
            email,
            password_hash: hash_password(password)?,
            active: true,
            created_at: chrono::Utc::now(),
        };
        let event = VisitEvent::new(user.id, EventAction::Register, None);

        self.users.insert_user_with_event(&user, &event).await?;
        info!("New user registered: {}", user.id);
        Ok(user)
    }

    /// 校验凭据并记录 login 事件；事件写入失败时登录失败
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_user_by_email(&email).await? else {
            return Err(ShortleakError::unauthorized(INVALID_CREDENTIALS));
        };

        if !user.active || !verify_password(password, &user.password_hash)? {
            warn!("Failed login attempt for user {}", user.id);
            return Err(ShortleakError::unauthorized(INVALID_CREDENTIALS));
        }

        self.logger.log(user.id, EventAction::Login, None).await?;
        info!("User logged in: {}", user.id);
        Ok(user)
    }

    /// 会话中间件使用：只返回仍然有效的用户
    pub async fn active_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .find_user_by_id(id)
            .await?
            .filter(|user| user.active))
    }
}
