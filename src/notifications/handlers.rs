// HTTP handlers for notification endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::notifications::{Notification, NotificationError, NotificationSetting, UpsertSettingRequest};

/// Query parameter identifying the acting user for single-notification
/// operations
#[derive(Debug, Deserialize)]
pub struct ActingUserQuery {
    pub user_id: String,
}

/// Handler for GET /api/notifications/:user_id
#[utoipa::path(
    get,
    path = "/api/notifications/user/{user_id}",
    params(
        ("user_id" = String, Path, description = "Recipient user id")
    ),
    responses(
        (status = 200, description = "Notifications, newest first", body = Vec<Notification>)
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Notification>>, NotificationError> {
    let notifications = state.notification_service.find_for_user(&user_id).await?;
    Ok(Json(notifications))
}

/// Handler for GET /api/notifications/:user_id/unread
#[utoipa::path(
    get,
    path = "/api/notifications/user/{user_id}/unread",
    params(
        ("user_id" = String, Path, description = "Recipient user id")
    ),
    responses(
        (status = 200, description = "Unread notifications, newest first", body = Vec<Notification>)
    ),
    tag = "notifications"
)]
pub async fn list_unread_notifications(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Notification>>, NotificationError> {
    let notifications = state.notification_service.find_unread(&user_id).await?;
    Ok(Json(notifications))
}

/// Handler for PUT /api/notifications/:id/read
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification id"),
        ("user_id" = String, Query, description = "Owning user id")
    ),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 404, description = "Notification not found for this user")
    ),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ActingUserQuery>,
) -> Result<Json<Notification>, NotificationError> {
    let notification = state
        .notification_service
        .mark_read(id, &query.user_id)
        .await?;
    Ok(Json(notification))
}

/// Handler for PUT /api/notifications/:user_id/read-all
#[utoipa::path(
    put,
    path = "/api/notifications/user/{user_id}/read-all",
    params(
        ("user_id" = String, Path, description = "Recipient user id")
    ),
    responses(
        (status = 200, description = "Count of notifications marked read")
    ),
    tag = "notifications"
)]
pub async fn mark_all_notifications_read(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, NotificationError> {
    let updated = state.notification_service.mark_all_read(&user_id).await?;
    Ok(Json(json!({ "updated": updated })))
}

/// Handler for GET /api/notification-settings
#[utoipa::path(
    get,
    path = "/api/notification-settings",
    responses(
        (status = 200, description = "All notification settings", body = Vec<NotificationSetting>)
    ),
    tag = "notifications"
)]
pub async fn list_settings(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<NotificationSetting>>, NotificationError> {
    let settings = state.notification_service.settings().await?;
    Ok(Json(settings))
}

/// Handler for PUT /api/notification-settings
/// Upserts the setting for one (source_app, action_type) event kind
#[utoipa::path(
    put,
    path = "/api/notification-settings",
    request_body = UpsertSettingRequest,
    responses(
        (status = 200, description = "Setting upserted", body = NotificationSetting)
    ),
    tag = "notifications"
)]
pub async fn upsert_setting(
    State(state): State<crate::AppState>,
    Json(request): Json<UpsertSettingRequest>,
) -> Result<Json<NotificationSetting>, NotificationError> {
    let setting = state.notification_service.upsert_setting(request).await?;
    Ok(Json(setting))
}
