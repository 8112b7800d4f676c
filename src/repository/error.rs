use crate::infrastructure::store::StoreError;
use crate::marshal::MarshalError;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("job not found")]
    JobNotFound,

    #[error("preset map not found")]
    PresetMapNotFound,

    #[error("preset map already exists")]
    PresetMapAlreadyExists,

    #[error("local preset not found")]
    LocalPresetNotFound,

    #[error("local preset already exists")]
    LocalPresetAlreadyExists,

    #[error("{key} was modified concurrently, retry the operation")]
    ConcurrencyConflict { key: String },

    #[error("could not generate identifier: {0}")]
    IdentifierGenerationFailed(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepositoryError::JobNotFound
                | RepositoryError::PresetMapNotFound
                | RepositoryError::LocalPresetNotFound
        )
    }

    /// Conflicts, identifier generation and connectivity can succeed on retry;
    /// everything else will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RepositoryError::ConcurrencyConflict { .. }
                | RepositoryError::IdentifierGenerationFailed(_)
                | RepositoryError::Store(_)
        )
    }
}
