use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A referenced tenant, rental or payment does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input was rejected before anything was written
    #[error("Validation error: {0}")]
    Validation(String),

    /// Stored snapshots disagree with the running-balance law after a recompute
    #[error("Consistency violation: {0}")]
    ConsistencyViolation(String),
}

impl ComputeError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ComputeError::NotFound(what.into())
    }

    pub fn validation(what: impl Into<String>) -> Self {
        ComputeError::Validation(what.into())
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
