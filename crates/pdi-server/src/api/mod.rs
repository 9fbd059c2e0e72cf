pub mod response;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, extract::State, routing::get, Json, Router};
use serde_json::json;
use tokio::{signal, sync::oneshot};
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::Config;
use crate::db::UnitOfWork;
use crate::error::AppError;
use crate::features::{self, SharedStore};
use crate::middleware;
use response::MessageResponse;

/// Bind and serve until Ctrl+C / SIGTERM
///
/// In-flight requests get `shutdown_timeout_secs` to finish once the signal
/// arrives; after that the server future is dropped.
pub async fn serve(config: Config, store: SharedStore) -> anyhow::Result<()> {
    let app = create_router(store, &config);

    let addr: SocketAddr = config.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    let timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let drain_deadline = async move {
        if signalled_rx.await.is_ok() {
            tracing::info!("Waiting up to {} seconds for connections to close", timeout.as_secs());
            tokio::time::sleep(timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = &mut server => {
            result?;
            tracing::info!("Server shut down gracefully");
        },
        _ = drain_deadline => {
            tracing::warn!("Shutdown timeout elapsed, dropping open connections");
        },
    }

    Ok(())
}

/// Create the application router with all routes and middleware
pub fn create_router(store: SharedStore, config: &Config) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(store.clone())
        .nest("/api", features::router(store))
        // Apply layers from innermost to outermost
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.server.max_body_bytes))
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello into test mode!",
    })
}

/// Open and immediately roll back a store session
async fn health(State(store): State<SharedStore>) -> Result<Json<serde_json::Value>, AppError> {
    let unit = UnitOfWork::begin(store.as_ref())
        .await
        .map_err(|e| AppError::Unavailable(e.to_string()))?;
    unit.rollback()
        .await
        .map_err(|e| AppError::Unavailable(e.to_string()))?;

    Ok(Json(json!({
        "status": "healthy",
        "database": "connected"
    })))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
