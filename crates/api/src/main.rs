use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use todos_db::{DocumentCollection, MemoryCollection, TodoRepo};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todos_api::config::{ServerConfig, StoreBackend};
use todos_api::router::build_app_router;
use todos_api::state::AppState;

#[tokio::main]
async fn main() {
    if dotenvy::dotenv().is_err() {
        eprintln!("No .env file found");
    }

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todos_api=debug,todos_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Document store ---
    let collection: Arc<dyn DocumentCollection> = match &config.store.backend {
        StoreBackend::Mongo {
            uri,
            db_name,
            collection: collection_name,
        } => {
            let collection = todos_db::mongo::connect(
                uri,
                db_name,
                collection_name,
                Duration::from_secs(config.store.connect_timeout_secs),
            )
            .await
            .expect("Failed to connect to MongoDB");
            tracing::info!(db = %db_name, collection = collection.name(), "Connected to MongoDB");
            Arc::new(collection)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; todos are lost on restart");
            Arc::new(MemoryCollection::new())
        }
    };

    // --- App state ---
    let state = AppState {
        todos: TodoRepo::new(collection, config.store.timeouts()),
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Server running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = drain_tx.send(());
            })
            .await
    });

    // Once a signal arrives, give in-flight requests a bounded time to finish.
    tokio::select! {
        result = &mut server => {
            result.expect("Server task panicked").expect("Server error");
        }
        _ = drain_rx => {
            match tokio::time::timeout(shutdown_timeout, &mut server).await {
                Ok(result) => result.expect("Server task panicked").expect("Server error"),
                Err(_) => {
                    tracing::warn!(?shutdown_timeout, "In-flight requests did not drain in time");
                    server.abort();
                }
            }
        }
    }

    tracing::info!("Server stopped gracefully");
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
            tracing::info!("Received SIGINT (Ctrl-C), shutting down server");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down server");
        }
    }
}
