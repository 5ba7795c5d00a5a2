use thiserror::Error;

/// Failures of core operations.
///
/// `NotFound` covers both "no such record" and "record belongs to someone
/// else"; callers cannot tell the two apart.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
