use axum::{
    extract::{Request, State},
    http::{Method, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::{debug, warn};

use shiftbook_types::api::Claims;

use crate::error::ApiError;
use crate::state::AppState;

/// Role required for any write.
pub const WRITER_ROLE: &str = "user";

/// Extract and validate the bearer JWT; the claims land in request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        debug!("rejected token: {}", e);
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(token_data.claims);
    Ok(next.run(req).await)
}

/// Role gate and per-caller rate limit for mutating methods. Reads pass
/// straight through. Must run after [`require_auth`].
pub async fn require_writer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_write(req.method()) {
        return Ok(next.run(req).await);
    }

    let (user_id, is_writer) = req
        .extensions()
        .get::<Claims>()
        .map(|claims| (claims.sub, claims.has_role(WRITER_ROLE)))
        .ok_or(ApiError::Unauthorized)?;

    if !is_writer {
        warn!(%user_id, method = %req.method(), "write without {} role", WRITER_ROLE);
        return Err(ApiError::Forbidden);
    }

    if !state.write_limiter.try_acquire(user_id).await {
        warn!(%user_id, "write rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    Ok(next.run(req).await)
}

fn is_write(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}
