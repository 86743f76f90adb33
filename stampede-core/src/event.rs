//! Per-action outcome records

use crate::types::ActionKind;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One completed action attempt. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    pub agent: String,
    pub action: ActionKind,
    pub start_time: DateTime<Utc>,
    pub duration_ms: u64,
    /// 0 when no response was received
    pub http_status: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ActionEvent {
    pub fn succeeded(
        agent: impl Into<String>,
        action: ActionKind,
        start_time: DateTime<Utc>,
        duration_ms: u64,
        http_status: u16,
    ) -> Self {
        Self {
            agent: agent.into(),
            action,
            start_time,
            duration_ms,
            http_status,
            success: true,
            error_message: None,
        }
    }

    pub fn failed(
        agent: impl Into<String>,
        action: ActionKind,
        start_time: DateTime<Utc>,
        duration_ms: u64,
        http_status: u16,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            agent: agent.into(),
            action,
            start_time,
            duration_ms,
            http_status,
            success: false,
            error_message: Some(error_message.into()),
        }
    }

    /// Whether the attempt got any HTTP response at all
    pub fn has_response(&self) -> bool {
        self.http_status != 0
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::milliseconds(self.duration_ms as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_event_carries_message() {
        let start = Utc::now();
        let event = ActionEvent::failed("alice", ActionKind::CreateItem, start, 40, 0, "connection refused");
        assert!(!event.success);
        assert!(!event.has_response());
        assert_eq!(event.error_message.as_deref(), Some("connection refused"));
        assert_eq!(event.end_time(), start + Duration::milliseconds(40));
    }

    #[test]
    fn test_event_json_shape() {
        let event = ActionEvent::succeeded("bob", ActionKind::ListItems, Utc::now(), 12, 200);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "list_items");
        assert_eq!(json["httpStatus"], 200);
        assert_eq!(json["durationMs"], 12);
        assert!(json.get("errorMessage").is_none());
    }
}
