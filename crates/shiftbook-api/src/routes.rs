use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use serde_json::{Value, json};

use shiftbook_types::Envelope;

use crate::middleware::{require_auth, require_writer};
use crate::state::AppState;
use crate::{adjustments, auth, employers, shifts};

/// Every REST route. Transport layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/shifts", get(shifts::list_shifts).post(shifts::create_shift))
        .route(
            "/shifts/{id}",
            get(shifts::get_shift)
                .put(shifts::update_shift)
                .delete(shifts::delete_shift),
        )
        .route(
            "/employers",
            get(employers::list_employers).post(employers::create_employer),
        )
        .route(
            "/employers/{id}",
            get(employers::get_employer)
                .put(employers::update_employer)
                .delete(employers::delete_employer),
        )
        .route(
            "/adjustments",
            get(adjustments::list_adjustments).post(adjustments::create_adjustment),
        )
        .route(
            "/adjustments/{id}",
            get(adjustments::get_adjustment)
                .put(adjustments::update_adjustment)
                .delete(adjustments::delete_adjustment),
        )
        // The last layer added runs first, so auth precedes the writer gate.
        .route_layer(middleware::from_fn_with_state(state.clone(), require_writer))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<Envelope<Value>> {
    Json(Envelope::success(json!({ "status": "ok" })))
}
