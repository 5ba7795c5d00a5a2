//! REST surface for shiftbook: auth, middleware, handlers and the router.

pub mod adjustments;
pub mod auth;
pub mod employers;
pub mod error;
pub mod middleware;
pub mod rate_limit;
pub mod routes;
pub mod shifts;
pub mod state;
pub mod validation;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::{AppState, AppStateInner};
