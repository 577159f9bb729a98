use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Read state of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationStatus {
    Unread,
    Read,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Unread => "UNREAD",
            NotificationStatus::Read => "READ",
        }
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity tag of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

impl Default for NotificationType {
    fn default() -> Self {
        NotificationType::Info
    }
}

/// A per-user notification record. Created once per (event, recipient)
/// pair; only its read status ever changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[schema(example = "Booking")]
    pub source_app: String,
    #[schema(example = "CREATE")]
    pub action_type: String,
    /// Correlation to the triggering business object, when known.
    pub entity_id: Option<String>,
    pub action_url: Option<String>,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}

/// Recipient rules for one fired event kind, keyed by
/// (source_app, action_type). Read-only at dispatch time; upserted by the
/// settings admin surface.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NotificationSetting {
    #[schema(example = "Booking")]
    pub source_app: String,
    #[schema(example = "CREATE")]
    pub action_type: String,
    pub is_active: bool,
    /// Role identifiers whose users receive the event.
    pub recipient_roles: Vec<String>,
    /// Group identifiers whose members receive the event.
    pub recipient_groups: Vec<String>,
    /// Delivery channel tags, e.g. "IN_APP".
    pub channels: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for upserting a notification setting
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpsertSettingRequest {
    pub source_app: String,
    pub action_type: String,
    pub is_active: Option<bool>,
    pub recipient_roles: Option<Vec<String>>,
    pub recipient_groups: Option<Vec<String>>,
    pub channels: Option<Vec<String>>,
}

/// Human-readable payload of a fired domain event.
#[derive(Debug, Clone)]
pub struct EventPayload {
    pub title: String,
    pub message: String,
    pub entity_id: Option<String>,
    pub action_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&NotificationStatus::Unread).unwrap(),
            "\"UNREAD\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationStatus::Read).unwrap(),
            "\"READ\""
        );
    }

    #[test]
    fn test_type_defaults_to_info() {
        assert_eq!(NotificationType::default(), NotificationType::Info);
    }

    #[test]
    fn test_notification_serializes_type_field() {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            title: "New Booking Created".to_string(),
            message: "Booking 24060101 created".to_string(),
            notification_type: NotificationType::Info,
            source_app: "Booking".to_string(),
            action_type: "CREATE".to_string(),
            entity_id: None,
            action_url: Some("/bookings/24060101".to_string()),
            status: NotificationStatus::Unread,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&notification).unwrap();
        assert!(json.contains("\"type\":\"INFO\""));
        assert!(json.contains("\"status\":\"UNREAD\""));
    }

    #[test]
    fn test_upsert_request_partial_fields() {
        let json = r#"{
            "source_app": "Booking",
            "action_type": "CREATE",
            "recipient_roles": ["manager"]
        }"#;

        let request: UpsertSettingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.recipient_roles, Some(vec!["manager".to_string()]));
        assert_eq!(request.is_active, None);
        assert_eq!(request.channels, None);
    }
}
