use sqlx::PgPool;
use uuid::Uuid;

use crate::notifications::error::NotificationError;
use crate::notifications::models::{
    EventPayload, Notification, NotificationSetting, NotificationStatus, NotificationType,
};

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, notification_type, source_app, \
     action_type, entity_id, action_url, status, created_at";

const SETTING_COLUMNS: &str =
    "source_app, action_type, is_active, recipient_roles, recipient_groups, channels, updated_at";

/// Repository for notification settings
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the setting for a fired (source_app, action_type) event
    pub async fn find_by_key(
        &self,
        source_app: &str,
        action_type: &str,
    ) -> Result<Option<NotificationSetting>, NotificationError> {
        let setting = sqlx::query_as::<_, NotificationSetting>(&format!(
            r#"
            SELECT {SETTING_COLUMNS} FROM notification_settings
            WHERE source_app = $1 AND action_type = $2
            "#
        ))
        .bind(source_app)
        .bind(action_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    /// List all settings, ordered for the admin surface
    pub async fn find_all(&self) -> Result<Vec<NotificationSetting>, NotificationError> {
        let settings = sqlx::query_as::<_, NotificationSetting>(&format!(
            "SELECT {SETTING_COLUMNS} FROM notification_settings ORDER BY source_app, action_type"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Upsert a setting by its (source_app, action_type) key. Omitted
    /// fields keep their stored values on update and fall back to defaults
    /// on insert.
    pub async fn upsert(
        &self,
        source_app: &str,
        action_type: &str,
        is_active: Option<bool>,
        recipient_roles: Option<Vec<String>>,
        recipient_groups: Option<Vec<String>>,
        channels: Option<Vec<String>>,
    ) -> Result<NotificationSetting, NotificationError> {
        let setting = sqlx::query_as::<_, NotificationSetting>(&format!(
            r#"
            INSERT INTO notification_settings
                (source_app, action_type, is_active, recipient_roles, recipient_groups, channels)
            VALUES ($1, $2, COALESCE($3, TRUE), COALESCE($4, '{{}}'), COALESCE($5, '{{}}'),
                    COALESCE($6, '{{IN_APP}}'))
            ON CONFLICT (source_app, action_type) DO UPDATE SET
                is_active = COALESCE($3, notification_settings.is_active),
                recipient_roles = COALESCE($4, notification_settings.recipient_roles),
                recipient_groups = COALESCE($5, notification_settings.recipient_groups),
                channels = COALESCE($6, notification_settings.channels),
                updated_at = NOW()
            RETURNING {SETTING_COLUMNS}
            "#
        ))
        .bind(source_app)
        .bind(action_type)
        .bind(is_active)
        .bind(recipient_roles)
        .bind(recipient_groups)
        .bind(channels)
        .fetch_one(&self.pool)
        .await?;

        Ok(setting)
    }
}

/// A group together with its member user ids, as recipient expansion needs
/// it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupMember {
    pub group_id: String,
    pub user_id: String,
}

/// Read-side gateway into the user/group directory for recipient
/// expansion.
#[derive(Clone)]
pub struct RecipientsRepository {
    pool: PgPool,
}

impl RecipientsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// User ids whose role identifier is in the given set
    pub async fn find_user_ids_by_roles(
        &self,
        roles: &[String],
    ) -> Result<Vec<String>, NotificationError> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<String> =
            sqlx::query_scalar("SELECT id FROM users WHERE role = ANY($1) ORDER BY id")
                .bind(roles)
                .fetch_all(&self.pool)
                .await?;

        Ok(user_ids)
    }

    /// Member user ids of the given groups, in (group, user) order
    pub async fn find_group_member_ids(
        &self,
        group_ids: &[String],
    ) -> Result<Vec<String>, NotificationError> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let members: Vec<GroupMember> = sqlx::query_as(
            r#"
            SELECT group_id, user_id FROM group_members
            WHERE group_id = ANY($1)
            ORDER BY group_id, user_id
            "#,
        )
        .bind(group_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(members.into_iter().map(|m| m.user_id).collect())
    }
}

/// Repository for per-user notification records
#[derive(Clone)]
pub struct NotificationsRepository {
    pool: PgPool,
}

impl NotificationsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create one notification for one recipient
    pub async fn create(
        &self,
        user_id: &str,
        source_app: &str,
        action_type: &str,
        notification_type: NotificationType,
        payload: &EventPayload,
    ) -> Result<Notification, NotificationError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications
                (user_id, title, message, notification_type, source_app, action_type,
                 entity_id, action_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&payload.title)
        .bind(&payload.message)
        .bind(notification_type)
        .bind(source_app)
        .bind(action_type)
        .bind(&payload.entity_id)
        .bind(&payload.action_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// All notifications for a user, newest first
    pub async fn find_for_user(&self, user_id: &str) -> Result<Vec<Notification>, NotificationError> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Unread notifications for a user, newest first
    pub async fn find_unread(&self, user_id: &str) -> Result<Vec<Notification>, NotificationError> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE user_id = $1 AND status = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(NotificationStatus::Unread)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Mark one notification read, scoped to its owner
    pub async fn mark_read(
        &self,
        id: Uuid,
        user_id: &str,
    ) -> Result<Notification, NotificationError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications
            SET status = $1
            WHERE id = $2 AND user_id = $3
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(NotificationStatus::Read)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(NotificationError::NotFound)?;

        Ok(notification)
    }

    /// Mark every unread notification of a user read; returns the number
    /// of rows changed
    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64, NotificationError> {
        let result = sqlx::query(
            "UPDATE notifications SET status = $1 WHERE user_id = $2 AND status = $3",
        )
        .bind(NotificationStatus::Read)
        .bind(user_id)
        .bind(NotificationStatus::Unread)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
