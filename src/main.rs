use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use insurance_admin_api::config::Config;
use insurance_admin_api::db::Database;
use insurance_admin_api::handlers::{self, AppState};
use insurance_admin_api::seed;

/// Main entry point for the application.
///
/// Initializes logging, loads configuration, opens the database (creating
/// the schema on first run), seeds demo data, and starts the Axum server.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insurance_admin_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Initialize database connection pool and schema
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    // Seed demo fixtures; existing rows are left untouched
    seed::seed_database(&db.pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to seed database: {}", e))?;
    tracing::info!("Database seeded");

    let port = config.port;
    let app_state = Arc::new(AppState {
        db: db.pool.clone(),
        config,
        reset_lock: Mutex::new(()),
    });

    let app = handlers::api_router(app_state)
        .layer(
            ServiceBuilder::new()
                // 1MB max payload
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Insurance Admin API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
