//! Shared helpers for API integration tests

use axum::Router;
use eventflow::api::{self, AppState};
use eventflow::config::Settings;
use eventflow::database::DatabaseService;
use eventflow::services::ServiceFactory;

/// Settings usable without any external services
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = "integration-test-secret-0123456789abcdef".to_string();
    settings
}

/// Build the full router over a lazy pool.
///
/// No connection is opened until a handler actually queries, so request
/// paths that are rejected before touching storage can be exercised
/// without a running database.
pub fn test_app() -> Router {
    let settings = test_settings();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(&settings.database.url)
        .expect("lazy pool construction should not fail");
    let db = DatabaseService::new(pool);
    let services = ServiceFactory::new(&db, &settings).expect("service construction");

    api::router(AppState {
        db,
        services,
        settings,
    })
}
