use uuid::Uuid;

use crate::notifications::error::NotificationError;
use crate::notifications::models::{Notification, NotificationSetting, UpsertSettingRequest};
use crate::notifications::repository::{NotificationsRepository, SettingsRepository};

/// Service for the user-facing notification surface and the settings
/// admin surface
#[derive(Clone)]
pub struct NotificationService {
    notifications: NotificationsRepository,
    settings: SettingsRepository,
}

impl NotificationService {
    pub fn new(notifications: NotificationsRepository, settings: SettingsRepository) -> Self {
        Self {
            notifications,
            settings,
        }
    }

    /// All notifications for a user, newest first
    pub async fn find_for_user(&self, user_id: &str) -> Result<Vec<Notification>, NotificationError> {
        self.notifications.find_for_user(user_id).await
    }

    /// Unread notifications for a user
    pub async fn find_unread(&self, user_id: &str) -> Result<Vec<Notification>, NotificationError> {
        self.notifications.find_unread(user_id).await
    }

    /// Mark one notification read; NotFound when the id does not exist or
    /// belongs to another user
    pub async fn mark_read(
        &self,
        id: Uuid,
        user_id: &str,
    ) -> Result<Notification, NotificationError> {
        self.notifications.mark_read(id, user_id).await
    }

    /// Mark all of a user's unread notifications read
    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64, NotificationError> {
        self.notifications.mark_all_read(user_id).await
    }

    /// List all notification settings
    pub async fn settings(&self) -> Result<Vec<NotificationSetting>, NotificationError> {
        self.settings.find_all().await
    }

    /// Upsert a setting by its (source_app, action_type) key
    pub async fn upsert_setting(
        &self,
        request: UpsertSettingRequest,
    ) -> Result<NotificationSetting, NotificationError> {
        self.settings
            .upsert(
                &request.source_app,
                &request.action_type,
                request.is_active,
                request.recipient_roles,
                request.recipient_groups,
                request.channels,
            )
            .await
    }
}
