//! Shiftbook core: owner-scoped records and the shift pay engine.
//!
//! Everything here is synchronous and storage-agnostic; it talks to a
//! [`DocumentStore`](shiftbook_db::DocumentStore) and never logs or
//! retries. Failures surface as [`CoreError`].

pub mod adjustments;
pub mod employers;
pub mod error;
pub mod normalize;
pub mod pay;
pub mod rate;
pub mod repository;
pub mod shifts;
pub mod totals;

#[cfg(test)]
pub(crate) mod testing;

pub use adjustments::AdjustmentService;
pub use employers::EmployerService;
pub use error::{CoreError, CoreResult};
pub use repository::{OwnedEntity, OwnedRepository};
pub use shifts::ShiftService;
