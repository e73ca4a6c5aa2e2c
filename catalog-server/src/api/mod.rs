//! API routes for catalog-server

pub mod global_fields;
pub mod health;
pub mod presenter;
pub mod product_merger;

use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use shared::error::{AppError, AppResult};
use tower_http::trace::TraceLayer;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/product-merger", product_merger::router())
        .nest("/api/brands", global_fields::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run storage-bound work on the blocking pool
async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "Blocking task failed");
        AppError::internal("Blocking task failed")
    })?
}
