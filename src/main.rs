pub mod bookings;
pub mod db;
pub mod notifications;
pub mod validation;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use bookings::{BookingService, BookingsRepository};
use notifications::{
    NotificationDispatcher, NotificationService, NotificationsRepository, RecipientsRepository,
    SettingsRepository,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        bookings::handlers::create_booking,
        bookings::handlers::list_bookings,
        bookings::handlers::booking_stats,
        bookings::handlers::get_booking,
        bookings::handlers::update_booking,
        bookings::handlers::delete_booking,
        notifications::handlers::list_notifications,
        notifications::handlers::list_unread_notifications,
        notifications::handlers::mark_notification_read,
        notifications::handlers::mark_all_notifications_read,
        notifications::handlers::list_settings,
        notifications::handlers::upsert_setting,
    ),
    components(
        schemas(
            bookings::Booking,
            bookings::CreateBookingRequest,
            bookings::UpdateBookingRequest,
            bookings::BookingStats,
            bookings::SlotStats,
            notifications::Notification,
            notifications::NotificationSetting,
            notifications::NotificationStatus,
            notifications::NotificationType,
            notifications::UpsertSettingRequest,
        )
    ),
    tags(
        (name = "bookings", description = "Truck gate booking queue"),
        (name = "notifications", description = "In-app notifications and recipient settings")
    ),
    info(
        title = "Gate Booking API",
        version = "1.0.0",
        description = "Truck booking queue allocation and notification fan-out for the supplier gate"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub booking_service: BookingService,
    pub notification_service: NotificationService,
}

impl AppState {
    fn new(db: PgPool) -> Self {
        let dispatcher = NotificationDispatcher::new(
            SettingsRepository::new(db.clone()),
            RecipientsRepository::new(db.clone()),
            NotificationsRepository::new(db.clone()),
        );
        let booking_service =
            BookingService::new(BookingsRepository::new(db.clone()), dispatcher);
        let notification_service = NotificationService::new(
            NotificationsRepository::new(db.clone()),
            SettingsRepository::new(db.clone()),
        );

        Self {
            db,
            booking_service,
            notification_service,
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(db: PgPool) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let state = AppState::new(db);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Booking routes
        .route("/api/bookings", post(bookings::handlers::create_booking))
        .route("/api/bookings", get(bookings::handlers::list_bookings))
        .route("/api/bookings/stats", get(bookings::handlers::booking_stats))
        .route("/api/bookings/:id", get(bookings::handlers::get_booking))
        .route("/api/bookings/:id", put(bookings::handlers::update_booking))
        .route(
            "/api/bookings/:id",
            delete(bookings::handlers::delete_booking),
        )
        // Notification routes
        .route(
            "/api/notifications/user/:user_id",
            get(notifications::handlers::list_notifications),
        )
        .route(
            "/api/notifications/user/:user_id/unread",
            get(notifications::handlers::list_unread_notifications),
        )
        .route(
            "/api/notifications/:id/read",
            put(notifications::handlers::mark_notification_read),
        )
        .route(
            "/api/notifications/user/:user_id/read-all",
            put(notifications::handlers::mark_all_notifications_read),
        )
        .route(
            "/api/notification-settings",
            get(notifications::handlers::list_settings),
        )
        .route(
            "/api/notification-settings",
            put(notifications::handlers::upsert_setting),
        )
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Gate Booking API - Starting...");

    // Get configuration from environment variables
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Create the application router
    let app = create_router(db_pool);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Gate Booking API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
