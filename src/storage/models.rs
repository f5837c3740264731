use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 短链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub url: String,
    pub short_token: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Link {
    pub fn new(owner_id: Uuid, url: impl Into<String>, short_token: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            url: url.into(),
            short_token: short_token.into(),
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// 事件类型，持久化为固定字符串
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventAction {
    Register,
    Login,
    CreateLink,
    VisitLink,
}

impl EventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::CreateLink => "create-link",
            Self::VisitLink => "visit-link",
        }
    }
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventAction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(Self::Register),
            "login" => Ok(Self::Login),
            "create-link" => Ok(Self::CreateLink),
            "visit-link" => Ok(Self::VisitLink),
            _ => Err(format!("Unknown event action: '{}'", s)),
        }
    }
}

/// 只追加的事件记录
///
/// `visit-link` 事件的 payload 形如 `{"shortToken": "...", "ogData": {...}}`，
/// 统计查询按 payload 中的 shortToken 关联链接。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitEvent {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub action: EventAction,
    pub payload: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl VisitEvent {
    pub fn new(actor_id: Uuid, action: EventAction, payload: Option<serde_json::Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id,
            action,
            payload,
            created_at: Utc::now(),
        }
    }

    /// payload 中记录的短码（仅 visit-link 事件携带）
    pub fn short_token(&self) -> Option<&str> {
        self.payload.as_ref()?.get("shortToken")?.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// 对外展示的用户信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitStats {
    pub total_visits: u64,
    pub unique_visitors: u64,
}

/// 分配结果：`created` 为 false 表示复用了同 URL 的已有链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub link: Link,
    pub created: bool,
}
