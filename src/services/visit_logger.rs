//! Append-only event logger

use std::sync::Arc;

use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::metadata::PageMetadata;
use crate::errors::Result;
use crate::storage::{EventAction, EventStore, VisitEvent};

#[derive(Clone)]
pub struct VisitLogger {
    events: Arc<dyn EventStore>,
}

impl VisitLogger {
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self { events }
    }

    /// 追加一条事件，写入失败直接返回给调用方
    pub async fn log(
        &self,
        actor_id: Uuid,
        action: EventAction,
        payload: Option<serde_json::Value>,
    ) -> Result<VisitEvent> {
        let event = VisitEvent::new(actor_id, action, payload);
        self.events.append_event(&event).await?;
        debug!("Logged {} for actor {}", action, actor_id);
        Ok(event)
    }

    pub async fn log_visit(
        &self,
        visitor_id: Uuid,
        short_token: &str,
        metadata: &PageMetadata,
    ) -> Result<VisitEvent> {
        let payload = json!({
            "ogData": metadata,
            "shortToken": short_token,
        });
        self.log(visitor_id, EventAction::VisitLink, Some(payload))
            .await
    }
}
