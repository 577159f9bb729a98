use async_trait::async_trait;

use crate::notifications::error::NotificationError;
use crate::notifications::models::{EventPayload, NotificationSetting, NotificationType};
use crate::notifications::recipient_resolver::resolve_recipients;
use crate::notifications::repository::{
    NotificationsRepository, RecipientsRepository, SettingsRepository,
};

/// Storage the dispatch pipeline reads and writes. Abstracted from the
/// concrete repositories so the gate logic can run against in-memory
/// state.
#[async_trait]
pub trait DispatchStore: Send + Sync {
    async fn find_setting(
        &self,
        source_app: &str,
        action_type: &str,
    ) -> Result<Option<NotificationSetting>, NotificationError>;

    async fn user_ids_by_roles(&self, roles: &[String]) -> Result<Vec<String>, NotificationError>;

    async fn group_member_ids(
        &self,
        group_ids: &[String],
    ) -> Result<Vec<String>, NotificationError>;

    async fn create_notification(
        &self,
        user_id: &str,
        source_app: &str,
        action_type: &str,
        notification_type: NotificationType,
        payload: &EventPayload,
    ) -> Result<(), NotificationError>;
}

/// The production store: the three Pg repositories bundled together.
#[derive(Clone)]
pub struct PgDispatchStore {
    settings: SettingsRepository,
    recipients: RecipientsRepository,
    notifications: NotificationsRepository,
}

#[async_trait]
impl DispatchStore for PgDispatchStore {
    async fn find_setting(
        &self,
        source_app: &str,
        action_type: &str,
    ) -> Result<Option<NotificationSetting>, NotificationError> {
        self.settings.find_by_key(source_app, action_type).await
    }

    async fn user_ids_by_roles(&self, roles: &[String]) -> Result<Vec<String>, NotificationError> {
        self.recipients.find_user_ids_by_roles(roles).await
    }

    async fn group_member_ids(
        &self,
        group_ids: &[String],
    ) -> Result<Vec<String>, NotificationError> {
        self.recipients.find_group_member_ids(group_ids).await
    }

    async fn create_notification(
        &self,
        user_id: &str,
        source_app: &str,
        action_type: &str,
        notification_type: NotificationType,
        payload: &EventPayload,
    ) -> Result<(), NotificationError> {
        self.notifications
            .create(user_id, source_app, action_type, notification_type, payload)
            .await?;
        Ok(())
    }
}

/// Resolves a fired domain event to its recipient set and writes one
/// notification per recipient.
///
/// Delivery is best-effort: `dispatch` never returns an error, so a failed
/// notification can never fail the booking mutation that triggered it. The
/// caller must have committed its own result before invoking this.
#[derive(Clone)]
pub struct NotificationDispatcher<S = PgDispatchStore> {
    store: S,
}

impl NotificationDispatcher {
    pub fn new(
        settings: SettingsRepository,
        recipients: RecipientsRepository,
        notifications: NotificationsRepository,
    ) -> Self {
        Self {
            store: PgDispatchStore {
                settings,
                recipients,
                notifications,
            },
        }
    }
}

impl<S: DispatchStore> NotificationDispatcher<S> {
    /// Fire an event. All internal failures are logged and swallowed.
    pub async fn dispatch(&self, source_app: &str, action_type: &str, payload: EventPayload) {
        match self.try_dispatch(source_app, action_type, &payload).await {
            Ok(sent) => {
                if sent > 0 {
                    tracing::info!(
                        "Notification sent for {}:{} to {} recipient(s)",
                        source_app,
                        action_type,
                        sent
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Notification dispatch failed for {}:{}: {}",
                    source_app,
                    action_type,
                    e
                );
            }
        }
    }

    /// The fallible dispatch pipeline. Returns the number of notifications
    /// created so the boundary above has one place to log.
    async fn try_dispatch(
        &self,
        source_app: &str,
        action_type: &str,
        payload: &EventPayload,
    ) -> Result<usize, NotificationError> {
        let setting = match self.store.find_setting(source_app, action_type).await? {
            Some(setting) if setting.is_active => setting,
            _ => {
                tracing::debug!(
                    "Notification skipped for {}:{} (disabled or not configured)",
                    source_app,
                    action_type
                );
                return Ok(0);
            }
        };

        let role_users = self
            .store
            .user_ids_by_roles(&setting.recipient_roles)
            .await?;
        let group_members = self
            .store
            .group_member_ids(&setting.recipient_groups)
            .await?;

        let recipients = resolve_recipients(role_users, group_members);

        let mut sent = 0;
        for user_id in &recipients {
            // Per-recipient failures must not stop the remaining fan-out.
            match self
                .store
                .create_notification(
                    user_id,
                    source_app,
                    action_type,
                    NotificationType::default(),
                    payload,
                )
                .await
            {
                Ok(()) => sent += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to notify user {} for {}:{}: {}",
                        user_id,
                        source_app,
                        action_type,
                        e
                    );
                }
            }
        }

        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        setting: Option<NotificationSetting>,
        role_users: Vec<String>,
        group_members: Vec<String>,
        fail_setting_lookup: bool,
        fail_user: Option<String>,
        created: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DispatchStore for MemoryStore {
        async fn find_setting(
            &self,
            _source_app: &str,
            _action_type: &str,
        ) -> Result<Option<NotificationSetting>, NotificationError> {
            if self.fail_setting_lookup {
                return Err(NotificationError::DatabaseError(
                    "settings unavailable".to_string(),
                ));
            }
            Ok(self.setting.clone())
        }

        async fn user_ids_by_roles(
            &self,
            roles: &[String],
        ) -> Result<Vec<String>, NotificationError> {
            if roles.is_empty() {
                return Ok(Vec::new());
            }
            Ok(self.role_users.clone())
        }

        async fn group_member_ids(
            &self,
            group_ids: &[String],
        ) -> Result<Vec<String>, NotificationError> {
            if group_ids.is_empty() {
                return Ok(Vec::new());
            }
            Ok(self.group_members.clone())
        }

        async fn create_notification(
            &self,
            user_id: &str,
            _source_app: &str,
            _action_type: &str,
            _notification_type: NotificationType,
            _payload: &EventPayload,
        ) -> Result<(), NotificationError> {
            if self.fail_user.as_deref() == Some(user_id) {
                return Err(NotificationError::DatabaseError(
                    "insert failed".to_string(),
                ));
            }
            self.created.lock().unwrap().push(user_id.to_string());
            Ok(())
        }
    }

    fn setting(is_active: bool, roles: &[&str], groups: &[&str]) -> NotificationSetting {
        NotificationSetting {
            source_app: "Booking".to_string(),
            action_type: "CREATE".to_string(),
            is_active,
            recipient_roles: roles.iter().map(|r| r.to_string()).collect(),
            recipient_groups: groups.iter().map(|g| g.to_string()).collect(),
            channels: vec!["IN_APP".to_string()],
            updated_at: Utc::now(),
        }
    }

    fn payload() -> EventPayload {
        EventPayload {
            title: "New Booking Created".to_string(),
            message: "Booking 24060101 created".to_string(),
            entity_id: Some("24060101".to_string()),
            action_url: None,
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_missing_setting_writes_nothing() {
        let dispatcher = NotificationDispatcher {
            store: MemoryStore {
                setting: None,
                role_users: strings(&["u1", "u2"]),
                ..MemoryStore::default()
            },
        };

        let sent = dispatcher
            .try_dispatch("Booking", "CREATE", &payload())
            .await
            .unwrap();

        assert_eq!(sent, 0);
        assert!(dispatcher.store.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inactive_setting_writes_nothing() {
        let dispatcher = NotificationDispatcher {
            store: MemoryStore {
                setting: Some(setting(false, &["manager"], &["g1"])),
                role_users: strings(&["u1", "u2"]),
                group_members: strings(&["u3"]),
                ..MemoryStore::default()
            },
        };

        let sent = dispatcher
            .try_dispatch("Booking", "CREATE", &payload())
            .await
            .unwrap();

        assert_eq!(sent, 0);
        assert!(dispatcher.store.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_active_setting_notifies_deduped_union() {
        let dispatcher = NotificationDispatcher {
            store: MemoryStore {
                setting: Some(setting(true, &["manager"], &["g1"])),
                role_users: strings(&["u1", "u2"]),
                group_members: strings(&["u2", "u3"]),
                ..MemoryStore::default()
            },
        };

        let sent = dispatcher
            .try_dispatch("Booking", "CREATE", &payload())
            .await
            .unwrap();

        assert_eq!(sent, 3);
        assert_eq!(
            *dispatcher.store.created.lock().unwrap(),
            strings(&["u1", "u2", "u3"])
        );
    }

    #[tokio::test]
    async fn test_recipient_failure_does_not_stop_fanout() {
        let dispatcher = NotificationDispatcher {
            store: MemoryStore {
                setting: Some(setting(true, &["manager"], &[])),
                role_users: strings(&["u1", "u2", "u3"]),
                fail_user: Some("u2".to_string()),
                ..MemoryStore::default()
            },
        };

        let sent = dispatcher
            .try_dispatch("Booking", "CREATE", &payload())
            .await
            .unwrap();

        assert_eq!(sent, 2);
        assert_eq!(
            *dispatcher.store.created.lock().unwrap(),
            strings(&["u1", "u3"])
        );
    }

    #[tokio::test]
    async fn test_dispatch_swallows_store_errors() {
        let dispatcher = NotificationDispatcher {
            store: MemoryStore {
                fail_setting_lookup: true,
                ..MemoryStore::default()
            },
        };

        // Must complete without propagating the error.
        dispatcher.dispatch("Booking", "CREATE", payload()).await;
        assert!(dispatcher.store.created.lock().unwrap().is_empty());
    }
}
