//! Shared types for the Shiftbook workspace.
//!
//! `models` holds the domain entities as the services hand them out,
//! `api` the request/response bodies of the HTTP surface, and `envelope`
//! the wrapper every HTTP response is sent in.

pub mod api;
pub mod envelope;
pub mod models;

pub use envelope::{Envelope, ErrorBody, Status};
