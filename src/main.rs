//! EventFlow server
//!
//! Main application entry point

use tracing::info;

use eventflow::{
    api,
    config::Settings,
    database::{
        connection::{create_pool, run_migrations, PoolConfig},
        DatabaseService,
    },
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", eventflow::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool_config = PoolConfig::from_settings(&settings.database);
    let pool = create_pool(&pool_config).await?;

    // Run database migrations
    run_migrations(&pool).await?;

    // Initialize database service and business services
    let db = DatabaseService::new(pool);
    let services = ServiceFactory::new(&db, &settings)?;

    // Start the background archiver
    if settings.archiver.enabled {
        let archiver = services.archiver(&db, &settings);
        archiver.spawn();
        info!(
            interval_hours = settings.archiver.interval_hours,
            "Archiver job started"
        );
    }

    // Build the router and serve
    let state = api::AppState {
        db,
        services,
        settings: settings.clone(),
    };
    let app = api::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "EventFlow is ready");

    axum::serve(listener, app).await?;

    Ok(())
}
