use std::sync::Arc;

use tracing::error;

use shiftbook_core::CoreResult;
use shiftbook_db::Database;

use crate::error::{ApiError, ApiResult};
use crate::rate_limit::WriteLimiter;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub write_limiter: WriteLimiter,
}

/// Run a blocking core call off the async runtime.
pub async fn run_blocking<F, T>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&Database) -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::internal("worker task failed")
        })?
        .map_err(ApiError::from)
}
