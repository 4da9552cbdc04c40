//! Error types for layer operations.

use thiserror::Error;

/// Error type for layer operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Images have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Buffer or region error from strata-core.
    #[error(transparent)]
    Core(#[from] strata_core::Error),
}

/// Result type for layer operations.
pub type OpsResult<T> = Result<T, OpsError>;
