//! HTTP API server for the Journal backend.
//!
//! [`router`] builds the axum [`Router`] for an [`AppState`];
//! [`serve`] runs it on a bound listener until the shutdown future
//! resolves.

#![doc = include_str!("../README.md")]

pub mod cookies;
pub mod error;
pub mod handlers;
pub mod state;

use std::future::Future;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Build the application router with every route under `prefix`.
///
/// An empty prefix or `/` mounts the routes at the root.
pub fn router(state: AppState, prefix: &str) -> Router {
    let prefix = normalize_prefix(prefix);
    let path = |suffix: &str| format!("{prefix}{suffix}");

    let mut app = Router::new().route(&path("/"), get(handlers::root));
    if !prefix.is_empty() {
        app = app.route(&prefix, get(handlers::root));
    }

    app.route(&path("/login"), axum::routing::post(handlers::login))
        .route(&path("/logout"), axum::routing::post(handlers::logout))
        .route(
            &path("/entries"),
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route(
            &path("/entries/{id}"),
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
        .route(&path("/categories"), get(handlers::list_categories))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` on `listener` until `shutdown` resolves, then drain
/// in-flight requests.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Journal API listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
