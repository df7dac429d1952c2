use std::net::SocketAddr;
use std::sync::Arc;

use hallpass_db::{MemoryStore, PassStore, PgStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hallpass_api::actor::PassRegistry;
use hallpass_api::config::ServerConfig;
use hallpass_api::router::build_app_router;
use hallpass_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hallpass_api=debug,hallpass_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        resource = %config.resource_name,
        admin_configured = config.admin.is_some(),
        "Loaded server configuration"
    );

    // --- Pass store ---
    let store = open_store(&config).await;
    let passes = store.map(|store| Arc::new(PassRegistry::new(store)));

    // Start the actor now so the one-time migration runs before traffic.
    if let Some(passes) = &passes {
        passes
            .handle(&config.resource_name)
            .await
            .expect("Failed to start pass actor");
    }

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        passes: passes.clone(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    if let Some(passes) = passes {
        passes.shutdown().await;
    }
    tracing::info!("Graceful shutdown complete");
}

/// Pick the pass store backend from configuration.
///
/// Returns `None` when neither a database nor the in-memory store is
/// configured; pass routes then answer 500.
async fn open_store(config: &ServerConfig) -> Option<Arc<dyn PassStore>> {
    if let Some(database_url) = &config.database_url {
        let pool = hallpass_db::create_pool(database_url)
            .await
            .expect("Failed to connect to database");
        tracing::info!("Database connection pool created");

        hallpass_db::health_check(&pool)
            .await
            .expect("Database health check failed");
        tracing::info!("Database health check passed");

        hallpass_db::run_migrations(&pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Database migrations applied");

        return Some(Arc::new(PgStore::new(pool)));
    }

    if config.in_memory_store {
        tracing::warn!("Using in-memory pass store; state is lost on restart");
        return Some(Arc::new(MemoryStore::new()));
    }

    tracing::error!("No pass store configured (set DATABASE_URL or HALLPASS_IN_MEMORY=true)");
    None
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
