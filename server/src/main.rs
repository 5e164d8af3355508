use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use staynngo_server::config::Config;
use staynngo_server::routes::create_routes;
use staynngo_server::services::AvailabilityReconciler;
use staynngo_server::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let reconciler =
        AvailabilityReconciler::new(pool.clone(), config.reconcile_interval).start();

    let app = create_routes(AppState::new(pool.clone()), &config);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    tracing::info!("Server running at http://{}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = ?e, "Server failed");
    }

    reconciler.shutdown().await;
    pool.close().await;

    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
